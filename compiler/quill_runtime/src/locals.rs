//! Storage arrays for hoisted locals.
//!
//! Each activation of a hoisted scope frame owns one [`StorageArray`]: one
//! cell per slot, index-aligned with the frame's slot map, plus a link to the
//! array of the enclosing activation. Arrays live in a [`LocalsArena`] and
//! link to their parent by [`ArrayId`], so walking outward is a loop over
//! plain indices.

use std::fmt;

use crate::{StrongBox, Value};

/// Index of a storage array in a [`LocalsArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ArrayId(u32);

impl ArrayId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ArrayId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayId({})", self.0)
    }
}

/// The cells of one activation of a hoisted scope frame.
#[derive(Clone, Debug)]
pub struct StorageArray {
    cells: Vec<StrongBox>,
    parent: Option<ArrayId>,
}

impl StorageArray {
    /// The cells, in slot order.
    pub fn cells(&self) -> &[StrongBox] {
        &self.cells
    }

    /// The enclosing activation's array, if any.
    pub fn parent(&self) -> Option<ArrayId> {
        self.parent
    }
}

/// Arena of storage arrays.
///
/// Arrays are never removed or resized after allocation; only the values
/// inside their cells change.
#[derive(Clone, Debug, Default)]
pub struct LocalsArena {
    arrays: Vec<StorageArray>,
}

impl LocalsArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an array over existing cells.
    ///
    /// Sharing a cell between arrays is how two frames alias one variable.
    pub fn push(&mut self, cells: Vec<StrongBox>, parent: Option<ArrayId>) -> ArrayId {
        let Ok(raw) = u32::try_from(self.arrays.len()) else {
            panic!("too many storage arrays: {}", self.arrays.len());
        };
        self.arrays.push(StorageArray { cells, parent });
        ArrayId::new(raw)
    }

    /// Allocate a fresh activation: `slot_count` new cells holding unit.
    pub fn activate(&mut self, slot_count: usize, parent: Option<ArrayId>) -> ArrayId {
        let cells = (0..slot_count).map(|_| StrongBox::new(Value::Unit)).collect();
        self.push(cells, parent)
    }

    /// Get an array.
    #[inline]
    pub fn get(&self, id: ArrayId) -> &StorageArray {
        &self.arrays[id.index()]
    }

    /// The parent-array accessor: the array of the enclosing activation.
    #[inline]
    pub fn parent(&self, id: ArrayId) -> Option<ArrayId> {
        self.get(id).parent
    }

    /// The cell at `slot` of array `id`.
    #[inline]
    pub fn cell(&self, id: ArrayId, slot: usize) -> Option<&StrongBox> {
        self.get(id).cells.get(slot)
    }

    /// Number of allocated arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if no arrays have been allocated.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}
