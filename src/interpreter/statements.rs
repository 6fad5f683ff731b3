//! Statement productions and blocks.
//!
//! A block opens a scope in the scope tree and releases it when the closing
//! brace is reached, so nothing declared inside a block outlives it.

use super::engine::Interpreter;
use super::errors::{ErrorKind, Result};
use super::stack::ensure_sufficient_stack;
use crate::lexer::TokenKind;

impl Interpreter {
    /// `Stat := DataDecl | CompStat | For | (AssignExpr? ';')`
    pub(crate) fn statement(&mut self) -> Result<()> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<()> {
        let token = self.tokens.peek(1).clone();
        match token.kind {
            kind if kind.is_data_type() => self.data_declaration(),
            TokenKind::LBrace => self.compound_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Void => Err(ErrorKind::InvalidType(token.text.clone()).at(&token)),
            // `float x;`: two names in a row can only be a declaration
            TokenKind::Ident if self.tokens.peek(2).is(TokenKind::Ident) => {
                Err(ErrorKind::InvalidType(token.text.clone()).at(&token))
            }
            _ => {
                if !self.check(TokenKind::Semicolon) {
                    self.assignment_expression()?;
                }
                self.expect(TokenKind::Semicolon)?;
                Ok(())
            }
        }
    }

    /// `CompStat := '{' Stat* '}'`
    pub(crate) fn compound_statement(&mut self) -> Result<()> {
        self.expect(TokenKind::LBrace)?;
        let block = self.tree.enter_block();
        let result = self.statement_list();
        self.tree.leave_block(block);
        result
    }

    fn statement_list(&mut self) -> Result<()> {
        while !self.check(TokenKind::RBrace) {
            // end of input surfaces from the statement as UnexpectedEof
            self.statement()?;
        }
        self.tokens.next();
        Ok(())
    }
}
