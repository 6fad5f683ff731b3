//! Execution engine for the interpreter
//!
//! There is no syntax tree. [`Interpreter`] parses the token stream by
//! recursive descent and performs each production's effect as soon as it is
//! recognised: declarations go straight into the [`ScopeTree`], expressions
//! produce a [`Value`], and loops and calls re-read their bodies by moving the
//! token cursor back to a saved [`Position`](crate::lexer::Position).
//!
//! Code that must be checked but not run (the body of a function other than
//! `main` at its declaration, the body of a loop whose condition is false) is
//! parsed with interpretation disabled on the scope tree; see
//! [`Interpreter::with_execution`].

use super::config::Config;
use super::errors::{CompileError, ErrorKind, Result};
use crate::lexer::{Token, TokenKind, TokenStream};
use crate::memory::scope_tree::ScopeTree;
use crate::memory::value::Value;
use tracing::{debug, warn};

/// The interpreter for a single source program
pub struct Interpreter {
    /// Replayable token cursor
    pub(crate) tokens: TokenStream,

    /// Symbol table and variable storage
    pub(crate) tree: ScopeTree,

    config: Config,

    /// Number of function activations currently running
    pub(crate) call_depth: usize,

    /// Whether a `main` function has been declared
    pub(crate) entry_point_seen: bool,
}

impl Interpreter {
    /// Create an interpreter for `source` with the default configuration.
    pub fn new(source: &str) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: &str, config: Config) -> Self {
        let mut tree = ScopeTree::new();
        tree.set_interpreting(config.execute);

        Interpreter {
            tokens: TokenStream::new(source),
            tree,
            config,
            call_depth: 0,
            entry_point_seen: false,
        }
    }

    /// Parse, check and execute the whole program.
    ///
    /// `Program := (DataDecl | FuncDecl)*`
    ///
    /// Stops at the first error. `main` runs as soon as its declaration is
    /// parsed, so globals declared after it are not visible to it.
    pub fn run(&mut self) -> Result<()> {
        debug!(
            tokens = self.tokens.tokens().len(),
            execute = self.config.execute,
            "interpreting program"
        );

        while !self.tokens.peek(1).is_eof() {
            self.top_level_declaration()?;
        }

        if !self.entry_point_seen {
            warn!("program declares no 'main' function, only global initializers ran");
        }
        debug!(nodes = self.tree.len(), "program finished");
        Ok(())
    }

    fn top_level_declaration(&mut self) -> Result<()> {
        let token = self.tokens.peek(1).clone();
        match token.kind {
            kind if kind.is_data_type() => self.data_declaration(),
            TokenKind::Void if self.looks_like_variable() => {
                Err(ErrorKind::InvalidType(token.text.clone()).at(&token))
            }
            TokenKind::Void => self.function_declaration(),
            _ => Err(ErrorKind::InvalidType(token.text.clone()).at(&token)),
        }
    }

    /// `void x;`, `void x = ...` and `void x, ...` declare variables.
    fn looks_like_variable(&self) -> bool {
        self.tokens.peek(2).kind.is_name()
            && matches!(
                self.tokens.peek(3).kind,
                TokenKind::Semicolon | TokenKind::Comma | TokenKind::Assign
            )
    }

    /// Final value of the variable `name` as seen from the global scope.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.tree.value_of(name)
    }

    pub fn scope_tree(&self) -> &ScopeTree {
        &self.tree
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.tokens.peek(1).is(kind)
    }

    /// Consume the next token, which must be of `kind`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.tokens.next();
        if token.is(kind) {
            Ok(token)
        } else {
            Err(ErrorKind::unexpected(kind, &token).at(&token))
        }
    }

    /// Consume a variable or parameter name.
    pub(crate) fn expect_identifier(&mut self) -> Result<Token> {
        let token = self.tokens.next();
        if token.is(TokenKind::Ident) {
            Ok(token)
        } else {
            Err(Self::not_a_name(&token))
        }
    }

    /// Error for a token found where a name was required.
    pub(crate) fn not_a_name(token: &Token) -> CompileError {
        if token.kind.is_keyword() {
            ErrorKind::InvalidIdentifier(token.text.clone()).at(token)
        } else {
            ErrorKind::unexpected(TokenKind::Ident, token).at(token)
        }
    }

    /// Runs `f` with interpretation narrowed to `enabled`: it can be turned
    /// off for the duration but never turned on if it was off already. The
    /// previous setting is restored whether or not `f` fails.
    pub(crate) fn with_execution<T>(
        &mut self,
        enabled: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.tree.is_interpreting();
        self.tree.set_interpreting(saved && enabled);
        let result = f(self);
        self.tree.set_interpreting(saved);
        result
    }
}
