//! Stack growth for recursive tree passes
//!
//! Building and attributing recurse once per tree level. Deeply nested
//! expressions would overflow the thread's stack, so recursive entry points
//! go through [`ensure_sufficient_stack`].

/// Grow the stack when less than this remains
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
