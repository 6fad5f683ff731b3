//! Interpreter configuration

/// Options for a single [`Interpreter`](super::engine::Interpreter) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Execute global initializers and `main`. When false the program is
    /// parsed and type-checked with interpretation disabled throughout.
    pub execute: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { execute: true }
    }
}

impl Config {
    /// Configuration for checking a program without running it.
    pub fn check_only() -> Self {
        Config { execute: false }
    }
}
