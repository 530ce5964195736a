//! Quoting errors.
//!
//! Every variant signals an inconsistency between the tree and the hoisted
//! locals it is quoted against: the compiler that hoisted the closure's
//! variables promised every free variable a cell. None of them is a user
//! error, and none is recoverable by retrying.

use quill_ir::{FrameId, VarId};

/// Error aborting a quote.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// A free variable is hoisted in no frame of the chain.
    #[error(
        "internal error: {var:?} is free in the quoted tree but not hoisted in {frame:?} or any enclosing frame"
    )]
    UnboundVariable { var: VarId, frame: FrameId },

    /// A frame maps a variable to a slot its storage array does not have.
    #[error("internal error: {frame:?} maps {var:?} to slot {slot}, past the end of its storage array")]
    MissingSlot {
        var: VarId,
        frame: FrameId,
        slot: usize,
    },

    /// The storage array chain ends before the frame chain does.
    #[error("internal error: storage arrays end before {frame:?}; frame and array chains disagree")]
    DetachedLocals { frame: FrameId },
}

impl QuoteError {
    /// Returns `true` if this error indicates a compiler bug rather than bad
    /// input. Currently every quote error does.
    pub fn is_internal(&self) -> bool {
        match self {
            QuoteError::UnboundVariable { .. }
            | QuoteError::MissingSlot { .. }
            | QuoteError::DetachedLocals { .. } => true,
        }
    }
}
