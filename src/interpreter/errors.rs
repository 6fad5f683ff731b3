//! Error types for the interpreter
//!
//! Parsing, type checking and execution happen in one pass, so a single
//! [`CompileError`] type covers all of them. Every error is fatal: the first
//! one raised unwinds to [`Interpreter::run`](super::engine::Interpreter::run)
//! and the run stops.

use crate::lexer::{SourceLocation, Token, TokenKind};
use crate::memory::value::DataType;
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the interpreter.
pub type Result<T> = std::result::Result<T, CompileError>;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Syntax
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("'{0}' cannot be used as a name")]
    InvalidIdentifier(String),

    #[error("'{0}' is not a valid type")]
    InvalidType(String),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("expected an expression, found '{0}'")]
    UnknownExpression(String),

    // Name resolution
    #[error("'{0}' is already defined in this scope")]
    RedefinedIdentifier(String),

    #[error("'{0}' is not defined")]
    UndefinedIdentifier(String),

    // Typing
    #[error("cannot convert {from} to {to}")]
    Uncastable { from: DataType, to: DataType },

    #[error("operator '{operator}' needs a variable operand")]
    InvalidOperands { operator: String },

    #[error("'{function}' takes {expected} argument(s) but {got} were given")]
    WrongArgCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error(
        "argument {position} of '{function}': cannot convert {found} to {expected}"
    )]
    WrongArgType {
        function: String,
        position: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("function '{0}' used as a variable")]
    UsingFunctionAsVariable(String),

    #[error("variable '{0}' used as a function")]
    UsingVariableAsFunction(String),

    #[error("variable '{0}' is used before being initialized")]
    UninitializedVariable(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    // Runtime
    #[error("division by zero")]
    DivisionByZero,
}

/// Coarse grouping of [`ErrorKind`]s, used for the diagnostic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Name,
    Typing,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "syntax error"),
            ErrorCategory::Name => write!(f, "name error"),
            ErrorCategory::Typing => write!(f, "type error"),
            ErrorCategory::Runtime => write!(f, "runtime error"),
        }
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::UnexpectedToken { .. }
            | ErrorKind::InvalidIdentifier(_)
            | ErrorKind::InvalidType(_)
            | ErrorKind::UnexpectedEof
            | ErrorKind::UnknownExpression(_) => ErrorCategory::Syntax,

            ErrorKind::RedefinedIdentifier(_)
            | ErrorKind::UndefinedIdentifier(_) => ErrorCategory::Name,

            ErrorKind::DivisionByZero => ErrorCategory::Runtime,

            _ => ErrorCategory::Typing,
        }
    }

    /// Attach the location of `token`. A syntax error found at end of input
    /// is reported as [`ErrorKind::UnexpectedEof`].
    pub fn at(self, token: &Token) -> CompileError {
        let kind = if token.kind == TokenKind::Eof
            && self.category() == ErrorCategory::Syntax
        {
            ErrorKind::UnexpectedEof
        } else {
            self
        };
        CompileError {
            kind,
            location: token.location,
        }
    }

    /// `expected` was required but `found` was read.
    pub fn unexpected(expected: impl fmt::Display, found: &Token) -> ErrorKind {
        ErrorKind::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// An [`ErrorKind`] with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub location: SourceLocation,
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let err = CompileError {
            kind: ErrorKind::UndefinedIdentifier("a".to_string()),
            location: SourceLocation::new(3, 14),
        };
        assert_eq!(err.location.to_string(), "(3, 14)");
        assert_eq!(err.to_string(), "(3, 14): 'a' is not defined");
    }

    #[test]
    fn test_syntax_error_at_eof() {
        let eof = Token::new(TokenKind::Eof, "", SourceLocation::new(2, 1));
        let err = ErrorKind::unexpected(TokenKind::Semicolon, &eof).at(&eof);
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "(2, 1): unexpected end of file");

        // only syntax errors are rewritten
        let err = ErrorKind::DivisionByZero.at(&eof);
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_unexpected_token_message() {
        let found = Token::new(TokenKind::RBrace, "}", SourceLocation::new(1, 17));
        let err = ErrorKind::unexpected(TokenKind::Semicolon, &found).at(&found);
        assert_eq!(err.to_string(), "(1, 17): expected ';', found '}'");
        assert_eq!(err.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ErrorKind::RedefinedIdentifier("x".into()).category(),
            ErrorCategory::Name
        );
        assert_eq!(
            ErrorKind::InvalidNumber("0x".into()).category(),
            ErrorCategory::Typing
        );
        assert_eq!(ErrorKind::DivisionByZero.category(), ErrorCategory::Runtime);
    }
}
