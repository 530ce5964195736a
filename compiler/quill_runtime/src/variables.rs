//! Indexable read/write views over groups of variables.

use std::fmt;
use std::rc::Rc;

use crate::{RuntimeError, StrongBox, Value};

/// A group of variables addressed as one indexable unit.
///
/// Reads and writes go through to the underlying storage; a view never
/// snapshots values. Implementations take `&self` for writes because the
/// storage behind them is already interior-mutable.
pub trait RuntimeVariables: fmt::Debug {
    /// Number of variables in the view.
    fn count(&self) -> usize;

    /// Read the current value at `index`.
    fn get(&self, index: usize) -> Result<Value, RuntimeError>;

    /// Write `value` at `index`.
    fn set(&self, index: usize, value: Value) -> Result<(), RuntimeError>;
}

/// Shared handle to a [`RuntimeVariables`] view.
///
/// Views are immutable once built and are embedded as tree constants, so
/// they are shared rather than copied.
#[derive(Clone)]
#[repr(transparent)]
pub struct VariablesRef(Rc<dyn RuntimeVariables>);

impl VariablesRef {
    /// Wrap a view in a shared handle.
    pub fn new(view: impl RuntimeVariables + 'static) -> Self {
        VariablesRef(Rc::new(view))
    }

    /// Returns `true` if both handles refer to the same view.
    #[inline]
    pub fn ptr_eq(&self, other: &VariablesRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Read every variable in order.
    pub fn values(&self) -> Result<Vec<Value>, RuntimeError> {
        (0..self.count()).map(|i| self.get(i)).collect()
    }
}

impl std::ops::Deref for VariablesRef {
    type Target = dyn RuntimeVariables;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for VariablesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A view over storage cells, in the order given.
///
/// This is what a variable list becomes once every one of its variables has
/// been resolved to a cell.
pub struct BoxedVariables {
    boxes: Box<[StrongBox]>,
}

impl BoxedVariables {
    /// Create a view over `boxes`.
    pub fn new(boxes: impl Into<Box<[StrongBox]>>) -> Self {
        BoxedVariables {
            boxes: boxes.into(),
        }
    }

    fn cell(&self, index: usize) -> Result<&StrongBox, RuntimeError> {
        self.boxes.get(index).ok_or(RuntimeError::IndexOutOfBounds {
            index,
            count: self.boxes.len(),
        })
    }
}

impl RuntimeVariables for BoxedVariables {
    fn count(&self) -> usize {
        self.boxes.len()
    }

    fn get(&self, index: usize) -> Result<Value, RuntimeError> {
        self.cell(index).map(StrongBox::get)
    }

    fn set(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        self.cell(index)?.set(value);
        Ok(())
    }
}

impl fmt::Debug for BoxedVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedVariables").field(&self.boxes).finish()
    }
}
