//! Shared mutable storage cells.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Value;

/// A single boxed value slot shared by every reference that captured it.
///
/// Cloning a `StrongBox` clones the handle, not the value: all clones
/// observe each other's writes. Two boxes alias exactly when
/// [`StrongBox::ptr_eq`] holds.
///
/// # Thread Safety
/// Not thread-safe. Quoting and evaluation of a quoted tree run on the
/// thread that owns the hoisted locals.
#[repr(transparent)]
pub struct StrongBox(Rc<RefCell<Value>>);

impl StrongBox {
    /// Create a new cell holding `value`.
    #[inline]
    pub fn new(value: Value) -> Self {
        StrongBox(Rc::new(RefCell::new(value)))
    }

    /// Read the current value.
    #[inline]
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Overwrite the current value, returning the previous one.
    #[inline]
    pub fn set(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    /// Returns `true` if both handles refer to the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &StrongBox) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this cell.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl Clone for StrongBox {
    #[inline]
    fn clone(&self) -> Self {
        StrongBox(Rc::clone(&self.0))
    }
}

impl Default for StrongBox {
    fn default() -> Self {
        StrongBox::new(Value::Unit)
    }
}

impl fmt::Debug for StrongBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A cell may hold a view that holds this cell; print the address
        // instead of recursing into the value.
        write!(f, "StrongBox({:p})", Rc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_aliases_cell() {
        let a = StrongBox::new(Value::Int(1));
        let b = a.clone();
        b.set(Value::Int(2));
        assert_eq!(a.get(), Value::Int(2));
        assert!(a.ptr_eq(&b));
        assert_eq!(a.handle_count(), 2);
    }

    #[test]
    fn test_distinct_cells_do_not_alias() {
        let a = StrongBox::new(Value::Int(1));
        let b = StrongBox::new(Value::Int(1));
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.get(), b.get());
    }

    #[test]
    fn test_set_returns_previous() {
        let cell = StrongBox::default();
        assert_eq!(cell.set(Value::Bool(true)), Value::Unit);
        assert_eq!(cell.get(), Value::Bool(true));
    }
}
