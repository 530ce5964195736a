//! Runtime error types.

/// Which underlying view of a merge an index map entry addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeSide {
    First,
    Second,
}

impl std::fmt::Display for MergeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeSide::First => write!(f, "first"),
            MergeSide::Second => write!(f, "second"),
        }
    }
}

/// Error reading or writing through a [`RuntimeVariables`](crate::RuntimeVariables) view.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Logical index is past the end of the view.
    #[error("variable index {index} is out of bounds for a view of {count} variables")]
    IndexOutOfBounds { index: usize, count: usize },
}

/// Caller contract violation in [`merge_runtime_variables`](crate::merge_runtime_variables).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The index map does not cover both views exactly.
    #[error(
        "index map has {len} entries but the merged views hold {first} + {second} variables"
    )]
    LengthMismatch {
        len: usize,
        first: usize,
        second: usize,
    },
    /// An index map entry addresses a slot past the end of its view.
    #[error(
        "index map entry {position} ({encoded}) addresses slot {slot} of the {side} view, which holds {count} variables"
    )]
    IndexOutOfRange {
        position: usize,
        encoded: i32,
        side: MergeSide,
        slot: usize,
        count: usize,
    },
}
