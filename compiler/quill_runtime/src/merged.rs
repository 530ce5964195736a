//! Merged variable views.
//!
//! When a variable list mixes captured and local variables, quoting splits
//! it in two: a view over the captured cells and a list of the remaining
//! local variables. [`MergedVariables`] stitches them back together so that
//! logical position `i` still addresses the variable originally at `i`.
//!
//! # Index Encoding
//!
//! Each index map entry is a [`Slot`] packed into an `i32`:
//!
//! ```text
//! entry >= 0   →  first[entry]
//! entry <  0   →  second[-1 - entry]
//! ```
//!
//! e.g. `first = [a, b]`, `second = [c, d, e]`, map `[0, -1, 1, -2, -3]`
//! reads as `[a, c, b, d, e]`.

use std::fmt;
use std::rc::Rc;

use crate::errors::MergeSide;
use crate::{MergeError, RuntimeError, RuntimeVariables, Value, VariablesRef};

/// A decoded index map entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Position in the first view.
    First(usize),
    /// Position in the second view.
    Second(usize),
}

impl Slot {
    /// Decode a sign-encoded index map entry.
    #[inline]
    pub fn decode(encoded: i32) -> Self {
        match usize::try_from(encoded) {
            Ok(index) => Slot::First(index),
            // encoded < 0, so encoded + 1 cannot overflow
            Err(_) => Slot::Second((encoded + 1).unsigned_abs() as usize),
        }
    }

    /// Encode this slot as an index map entry.
    ///
    /// # Panics
    /// Panics if the position does not fit the `i32` encoding.
    pub fn encode(self) -> i32 {
        match self {
            Slot::First(index) => to_i32(index),
            Slot::Second(index) => -1 - to_i32(index),
        }
    }

    /// Which view this slot addresses.
    pub fn side(self) -> MergeSide {
        match self {
            Slot::First(_) => MergeSide::First,
            Slot::Second(_) => MergeSide::Second,
        }
    }
}

fn to_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or_else(|_| {
        panic!("variable list too large: slot {index} does not fit an index map entry")
    })
}

/// Two variable views presented as one, in an order given by an index map.
///
/// Reading or writing position `i` decodes `indexes[i]` and forwards to the
/// addressed view. The merged view's length is the index map's length.
pub struct MergedVariables {
    first: VariablesRef,
    second: VariablesRef,
    indexes: Rc<[i32]>,
}

impl MergedVariables {
    /// Build a merged view without validating the index map.
    ///
    /// Out-of-range entries surface as [`RuntimeError::IndexOutOfBounds`] from
    /// the underlying view on access rather than at construction.
    pub fn new_unchecked(first: VariablesRef, second: VariablesRef, indexes: Rc<[i32]>) -> Self {
        MergedVariables {
            first,
            second,
            indexes,
        }
    }

    /// The sign-encoded index map.
    pub fn indexes(&self) -> &[i32] {
        &self.indexes
    }

    /// Resolve a logical position to its underlying view and slot.
    fn locate(&self, index: usize) -> Result<(&VariablesRef, usize), RuntimeError> {
        let Some(&encoded) = self.indexes.get(index) else {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                count: self.indexes.len(),
            });
        };
        Ok(match Slot::decode(encoded) {
            Slot::First(slot) => (&self.first, slot),
            Slot::Second(slot) => (&self.second, slot),
        })
    }
}

impl RuntimeVariables for MergedVariables {
    fn count(&self) -> usize {
        self.indexes.len()
    }

    fn get(&self, index: usize) -> Result<Value, RuntimeError> {
        let (view, slot) = self.locate(index)?;
        view.get(slot)
    }

    fn set(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let (view, slot) = self.locate(index)?;
        view.set(slot, value)
    }
}

impl fmt::Debug for MergedVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedVariables")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("indexes", &self.indexes)
            .finish()
    }
}

/// Combine two variable views into one through a sign-encoded index map.
///
/// The map must cover both views exactly: its length equals
/// `first.count() + second.count()` and every entry addresses an existing
/// slot. Violations are caller bugs and are reported before any access.
pub fn merge_runtime_variables(
    first: VariablesRef,
    second: VariablesRef,
    indexes: Rc<[i32]>,
) -> Result<MergedVariables, MergeError> {
    let (first_count, second_count) = (first.count(), second.count());
    if indexes.len() != first_count + second_count {
        tracing::debug!(
            len = indexes.len(),
            first_count,
            second_count,
            "rejected merge: index map length mismatch"
        );
        return Err(MergeError::LengthMismatch {
            len: indexes.len(),
            first: first_count,
            second: second_count,
        });
    }

    for (position, &encoded) in indexes.iter().enumerate() {
        let slot = Slot::decode(encoded);
        let (index, count) = match slot {
            Slot::First(index) => (index, first_count),
            Slot::Second(index) => (index, second_count),
        };
        if index >= count {
            tracing::debug!(position, encoded, "rejected merge: index out of range");
            return Err(MergeError::IndexOutOfRange {
                position,
                encoded,
                side: slot.side(),
                slot: index,
                count,
            });
        }
    }

    Ok(MergedVariables::new_unchecked(first, second, indexes))
}

#[cfg(test)]
mod tests;
