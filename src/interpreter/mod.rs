//! Interpreter: parser and executor in a single pass
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter) driver and token helpers
//! - [`errors`]: the error taxonomy shared by every stage
//! - [`config`]: run options
//!
//! Grammar productions are `impl Interpreter` blocks split by topic:
//! declarations, statements, `for` loops, expressions and calls.
//!
//! # Execution Model
//!
//! Statements execute while they are parsed. Loop and function bodies are
//! executed again by seeking the token cursor back to where they start;
//! there is no syntax tree to walk.

pub mod config;
pub mod engine;
pub mod errors;

mod calls;
mod declarations;
mod expressions;
mod literals;
mod loops;
mod stack;
mod statements;
