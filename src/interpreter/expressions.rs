//! Expression productions.
//!
//! Every level evaluates its operands as it parses them and folds them with
//! the scope tree's checked operators. Precedence, lowest first:
//!
//! | Level          | Operators                |
//! |----------------|--------------------------|
//! | assignment     | `=`                      |
//! | equality       | `==` `!=`                |
//! | relational     | `>` `>=` `<` `<=`        |
//! | additive       | `+` `-`                  |
//! | multiplicative | `*` `/` `%`              |
//! | prefix         | `+` `-` `++` `--`        |
//! | postfix        | `++` `--`, calls         |
//! | primary        | literals, names, `( )`   |

use super::engine::Interpreter;
use super::errors::{ErrorKind, Result};
use super::literals::parse_literal;
use super::stack::ensure_sufficient_stack;
use crate::lexer::{Token, TokenKind};
use crate::memory::node::NodeId;
use crate::memory::value::{check_cast, BinaryOp, DataType, UnaryOp, Value};

/// Result of an expression: its value and, when the expression names a
/// variable, that variable so `++`/`--` can write back to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Operand {
    pub value: Value,
    pub place: Option<NodeId>,
}

impl Operand {
    pub fn rvalue(value: Value) -> Self {
        Operand { value, place: None }
    }
}

impl Interpreter {
    /// `AssignExpr := (Id '=' EqualExpr) | EqualExpr`
    pub(crate) fn assignment_expression(&mut self) -> Result<Operand> {
        if !self.tokens.peek(2).is(TokenKind::Assign) {
            return self.equality_expression();
        }

        let target = self.tokens.next();
        if !target.is(TokenKind::Ident) {
            return Err(Self::not_a_name(&target));
        }
        let var = self
            .tree
            .resolve_variable(&target.text)
            .map_err(|e| e.at(&target))?;

        let assign = self.tokens.next();
        let value = self.equality_expression()?.value;
        let stored = self.tree.assign(var, value).map_err(|e| e.at(&assign))?;
        Ok(Operand::rvalue(stored))
    }

    fn equality_expression(&mut self) -> Result<Operand> {
        self.binary_level(&[BinaryOp::Eq, BinaryOp::Ne], Self::relational_expression)
    }

    fn relational_expression(&mut self) -> Result<Operand> {
        self.binary_level(
            &[BinaryOp::Gt, BinaryOp::Ge, BinaryOp::Lt, BinaryOp::Le],
            Self::additive_expression,
        )
    }

    fn additive_expression(&mut self) -> Result<Operand> {
        self.binary_level(&[BinaryOp::Add, BinaryOp::Sub], Self::multiplicative_expression)
    }

    fn multiplicative_expression(&mut self) -> Result<Operand> {
        self.binary_level(
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Rem],
            Self::prefix_expression,
        )
    }

    /// One left-associative level: `operand (op operand)*` for the given
    /// operators.
    fn binary_level(
        &mut self,
        operators: &[BinaryOp],
        operand: fn(&mut Self) -> Result<Operand>,
    ) -> Result<Operand> {
        let mut left = operand(self)?;

        while let Some(op) = BinaryOp::from_token(self.tokens.peek(1).kind)
            .filter(|op| operators.contains(op))
        {
            let op_token = self.tokens.next();
            let right = operand(self)?;
            let value = self
                .tree
                .binary_op(left.value, right.value, op)
                .map_err(|e| e.at(&op_token))?;
            left = Operand::rvalue(value);
        }

        Ok(left)
    }

    /// Prefix operators apply right to left, so `--++x` increments first.
    fn prefix_expression(&mut self) -> Result<Operand> {
        let Some(op) = UnaryOp::from_token(self.tokens.peek(1).kind) else {
            return self.postfix_expression();
        };
        let op_token = self.tokens.next();
        let operand = ensure_sufficient_stack(|| self.prefix_expression())?;

        Self::require_value(&operand, &op_token)?;
        if op.mutates() {
            let place = Self::require_place(&operand, op, &op_token)?;
            let (_, after) = self
                .tree
                .step_variable(place, op)
                .map_err(|e| e.at(&op_token))?;
            return Ok(Operand {
                value: after,
                place: Some(place),
            });
        }

        let value = self
            .tree
            .unary_op(op, operand.value)
            .map_err(|e| e.at(&op_token))?;
        Ok(Operand::rvalue(value))
    }

    fn postfix_expression(&mut self) -> Result<Operand> {
        let mut operand = if self.tokens.peek(1).kind.is_name()
            && self.tokens.peek(2).is(TokenKind::LParen)
        {
            self.call()?
        } else {
            self.primary_expression()?
        };

        loop {
            let op = match self.tokens.peek(1).kind {
                TokenKind::PlusPlus => UnaryOp::Increment,
                TokenKind::MinusMinus => UnaryOp::Decrement,
                _ => return Ok(operand),
            };
            let op_token = self.tokens.next();

            Self::require_value(&operand, &op_token)?;
            let place = Self::require_place(&operand, op, &op_token)?;
            let (before, _) = self
                .tree
                .step_variable(place, op)
                .map_err(|e| e.at(&op_token))?;
            operand = Operand::rvalue(before);
        }
    }

    /// `PrimExpr := Number | Id | 'main' | '(' AssignExpr ')'`
    fn primary_expression(&mut self) -> Result<Operand> {
        let token = self.tokens.next();
        match token.kind {
            TokenKind::LParen => {
                let inner = ensure_sufficient_stack(|| self.assignment_expression())?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident | TokenKind::Main => {
                let var = self
                    .tree
                    .resolve_variable(&token.text)
                    .map_err(|e| e.at(&token))?;
                let value = self.tree.read(var).map_err(|e| e.at(&token))?;
                Ok(Operand {
                    value,
                    place: Some(var),
                })
            }
            kind if kind.is_number() => parse_literal(&token)
                .map(Operand::rvalue)
                .map_err(|e| e.at(&token)),
            TokenKind::Invalid if token.text.starts_with(|c: char| c.is_ascii_digit()) => {
                Err(ErrorKind::InvalidNumber(token.text.clone()).at(&token))
            }
            _ => Err(ErrorKind::UnknownExpression(token.text.clone()).at(&token)),
        }
    }

    /// Operators never accept the result of a `void` call.
    fn require_value(operand: &Operand, op_token: &Token) -> Result<()> {
        check_cast(operand.value.data_type(), DataType::Int).map_err(|e| e.at(op_token))
    }

    fn require_place(operand: &Operand, op: UnaryOp, op_token: &Token) -> Result<NodeId> {
        operand.place.ok_or_else(|| {
            ErrorKind::InvalidOperands {
                operator: op.symbol().to_string(),
            }
            .at(op_token)
        })
    }
}
