//! Resolving variables against hoisted frames and their storage.
//!
//! A [`HoistedScope`] points at one frame of a [`ScopeChain`] and a
//! [`HoistedLocals`] at the storage array of one activation of that frame.
//! The two chains are walked in lockstep: moving to a frame's parent also
//! moves to the array's parent.

use quill_ir::{FrameId, ScopeChain, ScopeFrame, VarId};
use quill_runtime::{ArrayId, LocalsArena, StrongBox};

use crate::QuoteError;

/// A frame of a scope chain, with access to its ancestors.
#[derive(Copy, Clone, Debug)]
pub struct HoistedScope<'a> {
    chain: &'a ScopeChain,
    frame: FrameId,
}

impl<'a> HoistedScope<'a> {
    pub fn new(chain: &'a ScopeChain, frame: FrameId) -> Self {
        HoistedScope { chain, frame }
    }

    #[inline]
    pub fn frame(self) -> FrameId {
        self.frame
    }

    /// Slot layout of this frame.
    #[inline]
    pub fn layout(self) -> &'a ScopeFrame {
        self.chain.get(self.frame)
    }

    /// The enclosing frame, if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        self.layout().parent().map(|frame| HoistedScope {
            chain: self.chain,
            frame,
        })
    }
}

/// A storage array of a locals arena, with access to its ancestors.
#[derive(Copy, Clone, Debug)]
pub struct HoistedLocals<'a> {
    arena: &'a LocalsArena,
    array: ArrayId,
}

impl<'a> HoistedLocals<'a> {
    pub fn new(arena: &'a LocalsArena, array: ArrayId) -> Self {
        HoistedLocals { arena, array }
    }

    #[inline]
    pub fn array(self) -> ArrayId {
        self.array
    }

    /// Cell at `slot` of this array.
    #[inline]
    pub fn cell(self, slot: usize) -> Option<&'a StrongBox> {
        self.arena.cell(self.array, slot)
    }

    /// The enclosing activation's array, if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        self.arena.parent(self.array).map(|array| HoistedLocals {
            arena: self.arena,
            array,
        })
    }
}

/// Where a variable's cell was found.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub cell: StrongBox,
    /// Frame that hoists the variable.
    pub frame: FrameId,
    /// Parent links walked from the innermost frame to reach it.
    pub depth: usize,
}

/// Find the storage cell backing `var`.
///
/// Starts at the innermost frame/array pair and walks outward until a frame
/// hoists `var`. Shadowing is not consulted here; see
/// [`ExpressionQuoter::get_box`](crate::ExpressionQuoter::get_box).
///
/// # Errors
///
/// Fails when no frame hoists `var`, or when the frame and array chains
/// disagree. Both indicate that the hoisting analysis and the tree are out
/// of sync.
pub fn resolve_cell(
    scope: HoistedScope<'_>,
    locals: HoistedLocals<'_>,
    var: VarId,
) -> Result<Resolved, QuoteError> {
    let (mut scope_at, mut locals_at) = (scope, locals);
    let mut depth = 0;
    loop {
        if let Some(slot) = scope_at.layout().slot(var) {
            let Some(cell) = locals_at.cell(slot) else {
                return Err(QuoteError::MissingSlot {
                    var,
                    frame: scope_at.frame(),
                    slot,
                });
            };
            return Ok(Resolved {
                cell: cell.clone(),
                frame: scope_at.frame(),
                depth,
            });
        }

        let Some(parent_scope) = scope_at.parent() else {
            return Err(QuoteError::UnboundVariable {
                var,
                frame: scope.frame(),
            });
        };
        let Some(parent_locals) = locals_at.parent() else {
            return Err(QuoteError::DetachedLocals {
                frame: parent_scope.frame(),
            });
        };
        scope_at = parent_scope;
        locals_at = parent_locals;
        depth += 1;
    }
}

#[cfg(test)]
mod tests;
