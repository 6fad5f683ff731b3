//! `for` loop execution by replay.
//!
//! The loop header and body are parsed once to validate them, and then
//! re-read from saved token positions for every further iteration:
//!
//! ```text
//! for ( init ; cond ; step ) body
//!            ^       ^       ^     ^
//!       condition   step    body  body_end
//! ```
//!
//! After the last iteration the cursor is moved to `body_end`, so the
//! statement is consumed exactly once whatever the iteration count. A loop
//! whose condition is false on entry (including every loop parsed while
//! interpretation is disabled) runs its body once with interpretation off,
//! which type-checks it without effects.

use super::engine::Interpreter;
use super::errors::Result;
use crate::lexer::TokenKind;
use tracing::trace;

impl Interpreter {
    /// `For := 'for' '(' DataDecl AssignExpr ';' AssignExpr ')' Stat`
    pub(crate) fn for_statement(&mut self) -> Result<()> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let scope = self.tree.enter_block();
        let result = self.for_loop();
        self.tree.leave_block(scope);
        result
    }

    fn for_loop(&mut self) -> Result<()> {
        self.data_declaration()?;

        let condition = self.tokens.position();
        let mut proceed = self.loop_condition()?;
        self.expect(TokenKind::Semicolon)?;

        let step = self.tokens.position();
        self.with_execution(false, Self::assignment_expression)?;
        self.expect(TokenKind::RParen)?;

        let body = self.tokens.position();

        if !proceed {
            return self.with_execution(false, Self::loop_iteration);
        }

        let mut iterations = 0usize;
        let body_end = loop {
            self.tokens.set_position(body);
            self.loop_iteration()?;
            let end = self.tokens.position();
            iterations += 1;
            trace!(iterations, "loop iteration finished");

            self.tokens.set_position(step);
            self.assignment_expression()?;

            self.tokens.set_position(condition);
            proceed = self.tree.is_interpreting() && self.loop_condition()?;
            if !proceed {
                break end;
            }
        };

        self.tokens.set_position(body_end);
        Ok(())
    }

    fn loop_condition(&mut self) -> Result<bool> {
        let start = self.tokens.peek(1).clone();
        let value = self.assignment_expression()?.value;
        value.is_truthy().map_err(|e| e.at(&start))
    }

    /// Runs the body in a scope of its own, so a declaration used as the
    /// body is fresh on every iteration.
    fn loop_iteration(&mut self) -> Result<()> {
        let scope = self.tree.enter_block();
        let result = self.statement();
        self.tree.leave_block(scope);
        result
    }
}
