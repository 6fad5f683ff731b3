//! Function calls.
//!
//! Arguments are always evaluated and checked against the callee's
//! parameter types, even when interpretation is disabled. When it is
//! enabled the call then:
//!
//! 1. saves the token position and current scope node,
//! 2. copies the callee's parameter scope (fresh storage for this
//!    activation) and binds the arguments to it by value,
//! 3. moves the cursor to the callee's body and runs it against the copy,
//! 4. removes the copy and restores the saved position and node.
//!
//! Step 4 happens on the error path as well.

use super::engine::Interpreter;
use super::errors::{ErrorKind, Result};
use super::expressions::Operand;
use super::stack::ensure_sufficient_stack;
use crate::lexer::{Position, Token, TokenKind};
use crate::memory::node::NodeId;
use crate::memory::value::{check_cast, DataType, Value};
use tracing::debug;

impl Interpreter {
    /// `Call := (Id | 'main') '(' (AssignExpr (',' AssignExpr)*)? ')'`
    ///
    /// A call is an expression of type `void`.
    pub(crate) fn call(&mut self) -> Result<Operand> {
        let name = self.tokens.next();
        let func = self
            .tree
            .resolve_function(&name.text)
            .map_err(|e| e.at(&name))?;
        let params = self.tree.param_types(func);

        self.expect(TokenKind::LParen)?;
        let args = self.arguments(&name.text, &params)?;
        let close = self.expect(TokenKind::RParen)?;

        if args.len() != params.len() {
            return Err(ErrorKind::WrongArgCount {
                function: name.text.clone(),
                expected: params.len(),
                got: args.len(),
            }
            .at(&close));
        }

        if self.tree.is_interpreting() {
            self.invoke(func, &name, &args)?;
        }
        Ok(Operand::rvalue(Value::Void))
    }

    fn arguments(&mut self, function: &str, params: &[DataType]) -> Result<Vec<Value>> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            let start = self.tokens.peek(1).clone();
            let value = self.assignment_expression()?.value;

            if let Some(&expected) = params.get(args.len()) {
                if check_cast(value.data_type(), expected).is_err() {
                    return Err(ErrorKind::WrongArgType {
                        function: function.to_string(),
                        position: args.len() + 1,
                        expected,
                        found: value.data_type(),
                    }
                    .at(&start));
                }
            }
            args.push(value);

            if !self.check(TokenKind::Comma) {
                return Ok(args);
            }
            self.tokens.next();
        }
    }

    fn invoke(&mut self, func: NodeId, name: &Token, args: &[Value]) -> Result<()> {
        let body = self.tree.function(func).map_err(|e| e.at(name))?.body;
        let return_position = self.tokens.position();
        let return_node = self.tree.current();

        self.call_depth += 1;
        debug!(function = %name.text, depth = self.call_depth, "call");

        let activation = self.tree.clone_function_definition(func);
        let result =
            ensure_sufficient_stack(|| self.run_activation(activation, body, name, args));

        self.tree.delete_function_clone(activation);
        self.tree.set_current(return_node);
        self.tokens.set_position(return_position);
        self.call_depth -= 1;

        result
    }

    fn run_activation(
        &mut self,
        activation: NodeId,
        body: Position,
        name: &Token,
        args: &[Value],
    ) -> Result<()> {
        let last_param = self
            .tree
            .bind_params(activation, args)
            .map_err(|e| e.at(name))?;
        self.tree.set_current(last_param);
        self.tokens.set_position(body);
        self.compound_statement()
    }
}
