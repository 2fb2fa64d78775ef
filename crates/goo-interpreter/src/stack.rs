//! Native stack growth for deeply recursive Goo programs.
//!
//! Each interpreted call nests several Rust frames, and so does each level of
//! an expression or statement tree. A program well inside the configured call
//! depth could still exhaust the thread's stack, e.g. with a sum of 100k terms.
//! Calls, statements and expressions run through [`ensure_sufficient_stack`],
//! which moves onto a fresh segment when the remaining space gets low.

/// Below this much remaining stack, allocate a new segment.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
