//! Runtime value representation
//!
//! This module defines the [`Value`] enum and the integer rules the language
//! uses: promotion, casting, and checked binary/unary operators.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Long`]: 64-bit signed integer
//! - [`Value::Void`]: result of calling a `void` function; never stored in a
//!   variable
//!
//! # Promotion
//!
//! A binary operator works in `long` if either operand is `long`, otherwise
//! in `int`. Arithmetic wraps within that width. Comparisons always produce
//! an `int` `0` or `1`.

use crate::interpreter::errors::ErrorKind;
use crate::lexer::TokenKind;
use std::fmt;

/// Declared type of a variable or expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Long,
    Void,
}

impl DataType {
    /// Maps a type keyword to its type.
    pub fn from_keyword(kind: TokenKind) -> Option<DataType> {
        match kind {
            TokenKind::Int => Some(DataType::Int),
            TokenKind::Long => Some(DataType::Long),
            TokenKind::Void => Some(DataType::Void),
            _ => None,
        }
    }

    /// The value a variable of this type holds before anything is stored,
    /// and what every expression evaluates to while execution is disabled.
    pub fn zero(self) -> Value {
        match self {
            DataType::Int => Value::Int(0),
            DataType::Long => Value::Long(0),
            DataType::Void => Value::Void,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Long => write!(f, "long"),
            DataType::Void => write!(f, "void"),
        }
    }
}

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Void,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::Void => DataType::Void,
        }
    }

    /// Get the value widened to 64 bits, returns None for `Void`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::Void => None,
        }
    }

    /// Convert to `to`. `long` to `int` keeps the low 32 bits, `int` to
    /// `long` sign-extends. Anything involving `void` is uncastable.
    pub fn cast(self, to: DataType) -> Result<Value, ErrorKind> {
        check_cast(self.data_type(), to)?;
        Ok(match (self, to) {
            (Value::Int(n), DataType::Long) => Value::Long(i64::from(n)),
            (Value::Long(n), DataType::Int) => Value::Int(n as i32),
            (value, _) => value,
        })
    }

    /// Truthiness of a loop condition.
    pub fn is_truthy(&self) -> Result<bool, ErrorKind> {
        self.as_i64().map(|n| n != 0).ok_or(ErrorKind::Uncastable {
            from: DataType::Void,
            to: DataType::Int,
        })
    }

    /// Evaluate `self <op> rhs` with promotion. The right operand of `/` and
    /// `%` is checked for zero before anything is computed.
    pub fn binary_op(self, rhs: Value, op: BinaryOp) -> Result<Value, ErrorKind> {
        let operand_type = promote(self.data_type(), rhs.data_type())?;

        if matches!(op, BinaryOp::Div | BinaryOp::Rem) && rhs.as_i64() == Some(0) {
            return Err(ErrorKind::DivisionByZero);
        }

        if op.is_comparison() {
            let (l, r) = (self.as_i64(), rhs.as_i64());
            let holds = match op {
                BinaryOp::Eq => l == r,
                BinaryOp::Ne => l != r,
                BinaryOp::Gt => l > r,
                BinaryOp::Ge => l >= r,
                BinaryOp::Lt => l < r,
                _ => l <= r,
            };
            return Ok(Value::Int(i32::from(holds)));
        }

        match (self.cast(operand_type)?, rhs.cast(operand_type)?) {
            (Value::Int(l), Value::Int(r)) => Ok(Value::Int(match op {
                BinaryOp::Add => l.wrapping_add(r),
                BinaryOp::Sub => l.wrapping_sub(r),
                BinaryOp::Mul => l.wrapping_mul(r),
                BinaryOp::Div => l.wrapping_div(r),
                _ => l.wrapping_rem(r),
            })),
            (Value::Long(l), Value::Long(r)) => Ok(Value::Long(match op {
                BinaryOp::Add => l.wrapping_add(r),
                BinaryOp::Sub => l.wrapping_sub(r),
                BinaryOp::Mul => l.wrapping_mul(r),
                BinaryOp::Div => l.wrapping_div(r),
                _ => l.wrapping_rem(r),
            })),
            (l, r) => Err(ErrorKind::Uncastable {
                from: r.data_type(),
                to: l.data_type(),
            }),
        }
    }

    /// Apply a prefix `+`/`-` or add `delta` for `++`/`--`; the width is kept.
    pub fn unary_op(self, op: UnaryOp) -> Result<Value, ErrorKind> {
        let delta = match op {
            UnaryOp::Plus => 0,
            UnaryOp::Increment => 1,
            UnaryOp::Decrement => -1,
            UnaryOp::Negate => {
                return match self {
                    Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                    Value::Long(n) => Ok(Value::Long(n.wrapping_neg())),
                    Value::Void => Err(void_operand()),
                };
            }
        };
        match self {
            Value::Int(n) => Ok(Value::Int(n.wrapping_add(delta))),
            Value::Long(n) => Ok(Value::Long(n.wrapping_add(i64::from(delta)))),
            Value::Void => Err(void_operand()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}L"),
            Value::Void => write!(f, "void"),
        }
    }
}

/// Checks that a value of type `from` may be converted to `to`.
pub fn check_cast(from: DataType, to: DataType) -> Result<(), ErrorKind> {
    if from == DataType::Void || to == DataType::Void {
        return Err(ErrorKind::Uncastable { from, to });
    }
    Ok(())
}

/// The width both operands are brought to before a binary operator runs.
pub fn promote(left: DataType, right: DataType) -> Result<DataType, ErrorKind> {
    match (left, right) {
        (DataType::Void, other) | (other, DataType::Void) => {
            Err(ErrorKind::Uncastable {
                from: DataType::Void,
                to: if other == DataType::Void {
                    DataType::Int
                } else {
                    other
                },
            })
        }
        (DataType::Long, _) | (_, DataType::Long) => Ok(DataType::Long),
        _ => Ok(DataType::Int),
    }
}

fn void_operand() -> ErrorKind {
    ErrorKind::Uncastable {
        from: DataType::Void,
        to: DataType::Int,
    }
}

/// Binary operators, in the order the grammar's precedence levels list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => return None,
        })
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::Lt
                | BinaryOp::Le
        )
    }

    /// Type of `left <op> right` without evaluating it.
    pub fn result_type(
        self,
        left: DataType,
        right: DataType,
    ) -> Result<DataType, ErrorKind> {
        let promoted = promote(left, right)?;
        Ok(if self.is_comparison() {
            DataType::Int
        } else {
            promoted
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negate,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        match kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::PlusPlus => Some(UnaryOp::Increment),
            TokenKind::MinusMinus => Some(UnaryOp::Decrement),
            _ => None,
        }
    }

    /// `++` and `--` write back to the variable they apply to.
    pub fn mutates(self) -> bool {
        matches!(self, UnaryOp::Increment | UnaryOp::Decrement)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Negate => "-",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_truncates_and_extends() {
        assert_eq!(Value::Long(12).cast(DataType::Int), Ok(Value::Int(12)));
        assert_eq!(
            Value::Long(0x1_0000_0005).cast(DataType::Int),
            Ok(Value::Int(5))
        );
        assert_eq!(Value::Int(-1).cast(DataType::Long), Ok(Value::Long(-1)));
        assert_eq!(
            Value::Void.cast(DataType::Int),
            Err(ErrorKind::Uncastable {
                from: DataType::Void,
                to: DataType::Int
            })
        );
        assert!(Value::Int(1).cast(DataType::Void).is_err());
    }

    #[test]
    fn test_promotion() {
        assert_eq!(
            Value::Int(2).binary_op(Value::Long(3), BinaryOp::Mul),
            Ok(Value::Long(6))
        );
        assert_eq!(
            Value::Int(7).binary_op(Value::Int(2), BinaryOp::Div),
            Ok(Value::Int(3))
        );
        assert_eq!(
            Value::Int(-7).binary_op(Value::Int(2), BinaryOp::Rem),
            Ok(Value::Int(-1))
        );
    }

    #[test]
    fn test_int_arithmetic_wraps() {
        assert_eq!(
            Value::Int(i32::MAX).binary_op(Value::Int(1), BinaryOp::Add),
            Ok(Value::Int(i32::MIN))
        );
        assert_eq!(
            Value::Int(i32::MAX).binary_op(Value::Long(1), BinaryOp::Add),
            Ok(Value::Long(i64::from(i32::MAX) + 1))
        );
    }

    #[test]
    fn test_comparisons_yield_int() {
        assert_eq!(
            Value::Long(5).binary_op(Value::Int(5), BinaryOp::Eq),
            Ok(Value::Int(1))
        );
        assert_eq!(
            Value::Int(1).binary_op(Value::Int(2), BinaryOp::Ge),
            Ok(Value::Int(0))
        );
        assert_eq!(
            Value::Int(-1).binary_op(Value::Long(0), BinaryOp::Lt),
            Ok(Value::Int(1))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            Value::Int(1).binary_op(Value::Int(0), BinaryOp::Div),
            Err(ErrorKind::DivisionByZero)
        );
        assert_eq!(
            Value::Int(1).binary_op(Value::Long(0), BinaryOp::Rem),
            Err(ErrorKind::DivisionByZero)
        );
        assert_eq!(
            Value::Int(i32::MIN).binary_op(Value::Int(-1), BinaryOp::Div),
            Ok(Value::Int(i32::MIN))
        );
    }

    #[test]
    fn test_void_operands() {
        let err = Value::Int(1).binary_op(Value::Void, BinaryOp::Add);
        assert!(matches!(err, Err(ErrorKind::Uncastable { .. })));
        assert!(Value::Void.unary_op(UnaryOp::Increment).is_err());
        assert!(Value::Void.is_truthy().is_err());
    }

    #[test]
    fn test_unary() {
        assert_eq!(Value::Int(3).unary_op(UnaryOp::Negate), Ok(Value::Int(-3)));
        assert_eq!(
            Value::Long(3).unary_op(UnaryOp::Decrement),
            Ok(Value::Long(2))
        );
        assert_eq!(Value::Int(3).unary_op(UnaryOp::Plus), Ok(Value::Int(3)));
    }

    #[test]
    fn test_result_type() {
        assert_eq!(
            BinaryOp::Lt.result_type(DataType::Long, DataType::Long),
            Ok(DataType::Int)
        );
        assert_eq!(
            BinaryOp::Sub.result_type(DataType::Int, DataType::Long),
            Ok(DataType::Long)
        );
    }
}
