//! Declaration productions: variables, functions and parameter lists.

use super::engine::Interpreter;
use super::errors::{ErrorKind, Result};
use crate::lexer::{Token, TokenKind};
use crate::memory::node::NodeId;
use crate::memory::value::DataType;
use tracing::debug;

impl Interpreter {
    /// `DataDecl := Type Id ('=' AssignExpr)? (',' Id ('=' AssignExpr)?)* ';'`
    pub(crate) fn data_declaration(&mut self) -> Result<()> {
        let type_token = self.tokens.next();
        let data_type = Self::data_type(&type_token)?;

        loop {
            let name = self.expect_identifier()?;
            let var = self
                .tree
                .declare_variable(&name.text, data_type)
                .map_err(|e| e.at(&name))?;

            let mut token = self.tokens.next();
            if token.is(TokenKind::Assign) {
                let value = self.assignment_expression()?.value;
                self.tree.assign(var, value).map_err(|e| e.at(&token))?;
                token = self.tokens.next();
            }

            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::Semicolon => return Ok(()),
                _ => {
                    return Err(
                        ErrorKind::unexpected(TokenKind::Semicolon, &token).at(&token)
                    )
                }
            }
        }
    }

    /// `FuncDecl := 'void' (Id | 'main') '(' Params ')' CompStat`
    ///
    /// Only `main` runs here. Any other body is checked with interpretation
    /// disabled and runs later, once per call.
    pub(crate) fn function_declaration(&mut self) -> Result<()> {
        self.expect(TokenKind::Void)?;
        let name = self.tokens.next();
        if !name.kind.is_name() {
            return Err(Self::not_a_name(&name));
        }

        let func = self
            .tree
            .declare_function(&name.text)
            .map_err(|e| e.at(&name))?;
        self.expect(TokenKind::LParen)?;
        self.parameters(func)?;
        self.expect(TokenKind::RParen)?;

        self.tree.set_function_body(func, self.tokens.position());

        let is_entry_point = name.is(TokenKind::Main);
        if is_entry_point {
            self.entry_point_seen = true;
        }
        debug!(
            function = %name.text,
            params = self.tree.param_types(func).len(),
            runs = is_entry_point && self.tree.is_interpreting(),
            "function declared"
        );

        self.with_execution(is_entry_point, Self::compound_statement)?;
        self.tree.set_current(func);
        Ok(())
    }

    /// `Params := (Type Id (',' Type Id)*)?`
    fn parameters(&mut self, func: NodeId) -> Result<()> {
        let first = self.tokens.peek(1);
        if !first.kind.is_data_type() {
            // `(float x)`: an unknown type name rather than a missing `)`
            if first.is(TokenKind::Ident) && self.tokens.peek(2).is(TokenKind::Ident) {
                return Err(ErrorKind::InvalidType(first.text.clone()).at(first));
            }
            return Ok(());
        }

        loop {
            let type_token = self.tokens.next();
            let data_type = Self::data_type(&type_token)?;
            let name = self.expect_identifier()?;
            self.tree
                .declare_param(func, &name.text, data_type)
                .map_err(|e| e.at(&name))?;

            if !self.check(TokenKind::Comma) {
                return Ok(());
            }
            self.tokens.next();
        }
    }

    /// Type of a variable declaration; only `int` and `long` are allowed.
    fn data_type(token: &Token) -> Result<DataType> {
        DataType::from_keyword(token.kind)
            .filter(|_| token.kind.is_data_type())
            .ok_or_else(|| ErrorKind::InvalidType(token.text.clone()).at(token))
    }
}
