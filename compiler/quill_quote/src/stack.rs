//! Stack growth for deeply nested trees.
//!
//! The quoter recurses once per tree level: `rewrite_expr` walks a node,
//! which rewrites each child through `rewrite_expr` again. Trees handed to
//! `quote` are often machine-built (expression builders, query translators)
//! and can nest tens of thousands of levels deep, far past what the default
//! thread stack holds. [`ExpressionQuoter::rewrite_expr`] therefore runs every
//! level through [`ensure_sufficient_stack`], which grows the stack on demand
//! and passes the level's `Result` straight through, so an error raised deep
//! in the tree still reaches `quote` by `?`.
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: passthrough (WASM manages its own stack).
//!
//! [`ExpressionQuoter::rewrite_expr`]: crate::ExpressionQuoter

/// Stack that must remain before descending into one more tree level.
const RED_ZONE: usize = 100 * 1024;

/// Size of each freshly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run one quoting level, growing the stack first if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
