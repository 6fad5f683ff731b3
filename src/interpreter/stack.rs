//! Host stack guard for the interpreter's own recursion.
//!
//! Parenthesised expressions, prefix operators, nested statements and
//! interpreted calls all recurse on the host stack. Each of those entry
//! points goes through [`ensure_sufficient_stack`], which moves execution to
//! a freshly allocated segment when the remaining stack runs low.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
