//! Memory model for the interpreter
//!
//! This module provides the core storage abstractions:
//! - [`value`]: runtime values and the integer promotion/cast rules
//! - [`node`]: scope tree node payloads (markers, variables, functions)
//! - [`scope_tree`]: the symbol table, which also stores every variable's value
//!
//! # Type Sizes
//!
//! `int` is 32 bits and `long` is 64 bits on every host. Conversions between
//! them never fail: narrowing keeps the low 32 bits.

pub mod node;
pub mod scope_tree;
pub mod value;
