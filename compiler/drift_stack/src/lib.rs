//! Stack headroom for deep recursion.
//!
//! The parser descends once per nesting level and the evaluator descends once
//! per active call, so pathological inputs (thousands of nested parentheses,
//! deeply recursive user functions) can exhaust the host thread's stack long
//! before any configured limit trips. Wrapping the recursive entry points in
//! [`ensure_sufficient_stack`] grows the stack in segments instead, leaving
//! limits as the only way a deep program stops.
//!
//! On WASM the guard is a passthrough; the engine manages its own stack.

/// Remaining stack below this many bytes triggers a growth segment.
const RED_ZONE: usize = 100 * 1024;

/// Size of each growth segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
///
/// Call this at every self-recursive frontier: the recursive descent
/// productions in the parser and the expression/statement walkers in the
/// evaluator. The cost when no growth is needed is a single stack-pointer
/// comparison.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM passthrough.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
