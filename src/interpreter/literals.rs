//! Integer literal evaluation
//!
//! The lexer only classifies literals; their value is computed when the
//! interpreter reaches them so an oversized literal is reported in source
//! order. Magnitudes up to `i64::MAX` are accepted in every radix. A literal
//! without suffix is `int` when it fits in 32 bits and `long` otherwise; an
//! `l`/`L` suffix always makes it `long`.

use super::errors::ErrorKind;
use crate::lexer::{Token, TokenKind};
use crate::memory::value::Value;

pub(crate) fn parse_literal(token: &Token) -> Result<Value, ErrorKind> {
    let invalid = || ErrorKind::InvalidNumber(token.text.clone());

    let text = token.text.as_str();
    let (digits, force_long) = match text.strip_suffix(['l', 'L']) {
        Some(digits) => (digits, true),
        None => (text, false),
    };

    let (digits, radix) = match token.kind {
        TokenKind::HexNumber => (&digits[2..], 16),
        // the leading `0` is the octal prefix; a bare `0` has no digits left
        TokenKind::OctNumber => (&digits[1..], 8),
        TokenKind::DecNumber => (digits, 10),
        _ => return Err(invalid()),
    };

    let magnitude = if digits.is_empty() {
        0
    } else {
        i64::from_str_radix(digits, radix).map_err(|_| invalid())?
    };

    Ok(match i32::try_from(magnitude) {
        Ok(small) if !force_long => Value::Int(small),
        _ => Value::Long(magnitude),
    })
}
