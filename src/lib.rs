//! # Introduction
//!
//! minic type-checks and executes programs in a small C-like teaching
//! language in a single pass: the parser is the interpreter. There is no
//! syntax tree. Loops and function calls run again by rewinding the token
//! cursor to where their bodies start.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → TokenStream ⇄ Interpreter ⇄ ScopeTree
//! ```
//!
//! 1. [`lexer`]: tokenises the source into a seekable [`lexer::TokenStream`].
//! 2. [`interpreter`]: recursive descent over the token stream; every
//!    production performs its effect as soon as it is parsed.
//! 3. [`memory`]: the [`memory::scope_tree::ScopeTree`], a tree of nested
//!    scopes that is both the symbol table and the storage of every variable,
//!    and the [`memory::value::Value`] integer model.
//!
//! ## Supported language
//!
//! Types: `int` (32-bit), `long` (64-bit), `void` functions.
//! Statements: declarations, blocks, `for`, expression statements.
//! Operators: `= == != > >= < <= + - * / % ++ --`.
//! Execution starts at `void main()`; parsing stops at the first error.
//!
//! ```
//! use minic::interpreter::engine::Interpreter;
//! use minic::memory::value::Value;
//!
//! let mut interpreter = Interpreter::new(
//!     "int res; void main() { res = 6 * 7; }",
//! );
//! interpreter.run().unwrap();
//! assert_eq!(interpreter.value_of("res"), Some(Value::Int(42)));
//! ```

pub mod interpreter;
pub mod lexer;
pub mod memory;

pub use interpreter::config::Config;
pub use interpreter::engine::Interpreter;
pub use interpreter::errors::{CompileError, ErrorCategory, ErrorKind};
