//! Variable identities.

use std::fmt;

use crate::Name;

/// Identity of a variable introduced by a binding construct.
///
/// Variables are compared by identity: two variables spelled `x` in the
/// source are distinct `VarId`s. Tree nodes refer to variables, they never
/// own them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        VarId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

/// Metadata for a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    /// Source name, for diagnostics only.
    pub name: Name,
}

/// Range of variables in the arena's flattened variable lists.
///
/// Used for lambda parameters, block locals, and variable-list nodes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VarRange {
    pub start: u32,
    pub len: u16,
}

impl VarRange {
    /// Empty range.
    pub const EMPTY: VarRange = VarRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        VarRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for VarRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarRange({}..{})", self.start, self.start + u32::from(self.len))
    }
}
