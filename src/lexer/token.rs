//! Token definitions for the lexer
//!
//! Unlike a purely structural token, every [`Token`] keeps its exact source
//! text. Numeric literals are classified by radix here but only evaluated
//! when the interpreter reaches them, so an out-of-range literal is reported
//! in source order together with every other error.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    For,
    Int,
    Long,
    Void,
    Main,

    // Identifiers and literals
    Ident,
    DecNumber,
    HexNumber,
    OctNumber,

    // Operators
    Assign,     // =
    EqEq,       // ==
    NotEq,      // !=
    Gt,         // >
    Ge,         // >=
    Lt,         // <
    Le,         // <=
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    PlusPlus,   // ++
    MinusMinus, // --

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;

    /// A character or word that is not part of the language
    Invalid,

    Eof,
}

impl TokenKind {
    /// `int` and `long`, the only types a variable can be declared with.
    pub fn is_data_type(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Long)
    }

    /// Returns true for tokens that name something: plain identifiers and
    /// the `main` keyword.
    pub fn is_name(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::Main)
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenKind::DecNumber | TokenKind::HexNumber | TokenKind::OctNumber
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::For
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Void
                | TokenKind::Main
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::Long => write!(f, "'long'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::Main => write!(f, "'main'"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::DecNumber => write!(f, "decimal number"),
            TokenKind::HexNumber => write!(f, "hexadecimal number"),
            TokenKind::OctNumber => write!(f, "octal number"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::PlusPlus => write!(f, "'++'"),
            TokenKind::MinusMinus => write!(f, "'--'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Invalid => write!(f, "invalid token"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A lexeme with its kind and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}
