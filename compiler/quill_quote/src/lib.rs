//! Closure quoting for Quill.
//!
//! Given the expression tree of a closure and the hoisted locals it was
//! created in, [`quote`] produces an equivalent, self-contained tree in which
//! every captured variable reads and writes its live storage cell directly.
//! The cells are burned into the tree as constants, so the quoted tree can be
//! evaluated long after the frames that created it are gone and still
//! observe (and make) the same mutations the closure would.
//!
//! # Pipeline Position
//!
//! ```text
//! Compile (hoisting decided) → Run → closure quoted at runtime → **Quote** → consumer
//! ```
//!
//! # What Happens During Quoting
//!
//! 1. **Shadowing** (`shadow`): lambdas, blocks with locals, and handlers with
//!    a caught variable bind names for their children. Bound variables are
//!    local to the quoted tree and are left alone.
//! 2. **Resolution** (`scope`): every other variable is looked up frame by
//!    frame, outward from the innermost hoisted frame, alongside the matching
//!    storage arrays.
//! 3. **Rewrite** (`quoter`): a resolved variable reference becomes
//!    `CellValue(Constant(cell))`. A variable list becomes a constant view
//!    over its cells, or, when only some of its variables resolve, a merge of
//!    that view with a list of the remaining locals.
//!
//! Subtrees with nothing to rewrite keep their `ExprId`, so quoting a tree
//! with no captures returns the original root and allocates nothing.
//!
//! # Logging
//!
//! Enable with `RUST_LOG=quill_quote=debug` (per-call summary) or
//! `RUST_LOG=quill_quote=trace` (per-variable decisions) after calling
//! [`init_tracing`].

mod errors;
mod quoter;
mod scope;
mod shadow;
mod stack;

pub use errors::QuoteError;
pub use quoter::{ExpressionQuoter, QuoteStats};
pub use scope::{resolve_cell, HoistedLocals, HoistedScope, Resolved};
pub use shadow::ShadowStack;
pub use stack::ensure_sufficient_stack;

use quill_ir::{ExprArena, ExprId};
use std::sync::Once;

/// Quote the tree rooted at `root`.
///
/// `scope` is the innermost hoisted frame the closure was created in and
/// `locals` is that frame's live storage array. New nodes are appended to
/// `arena`; the original tree is never modified. Returns the quoted root,
/// which is `root` itself when nothing was captured.
///
/// # Errors
///
/// Returns an internal-consistency [`QuoteError`] when a variable that is
/// neither bound inside the tree nor hoisted in any enclosing frame is
/// found. No quoted root is produced in that case; nodes appended before the
/// failure are unreachable from any root.
#[tracing::instrument(level = "debug", skip_all, fields(root = ?root, frame = ?scope.frame()))]
pub fn quote(
    arena: &mut ExprArena,
    root: ExprId,
    scope: HoistedScope<'_>,
    locals: HoistedLocals<'_>,
) -> Result<ExprId, QuoteError> {
    let mut quoter = ExpressionQuoter::new(scope, locals);
    let quoted = quoter.quote(arena, root)?;
    tracing::debug!(
        stats = ?quoter.stats(),
        changed = quoted != root,
        "quote complete"
    );
    Ok(quoted)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=quill_quote=debug` or `RUST_LOG=quill_quote=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
