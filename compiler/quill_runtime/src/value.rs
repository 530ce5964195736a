//! Runtime values stored in cells and embedded as tree constants.

use std::fmt;
use std::rc::Rc;

use crate::{StrongBox, VariablesRef};

/// A runtime value.
///
/// Scalars compare by value. Cells and variable views compare by identity,
/// since a quoted tree cares about *which* storage it refers to.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Unit,
    Bool(bool),
    Int(i64),
    /// Stored as bits so `Value` can be `Eq`.
    Float(u64),
    Str(Rc<str>),
    /// A storage cell burned into a quoted tree.
    Cell(StrongBox),
    /// An indexable view over a group of variables.
    Variables(VariablesRef),
    /// Sign-encoded index map for [`merge_runtime_variables`](crate::merge_runtime_variables).
    Indexes(Rc<[i32]>),
}

impl Value {
    /// Create a float value.
    #[inline]
    pub fn float(value: f64) -> Self {
        Value::Float(value.to_bits())
    }

    /// The cell, if this value is one.
    pub fn as_cell(&self) -> Option<&StrongBox> {
        match self {
            Value::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    /// The variable view, if this value is one.
    pub fn as_variables(&self) -> Option<&VariablesRef> {
        match self {
            Value::Variables(view) => Some(view),
            _ => None,
        }
    }

    /// The index map, if this value is one.
    pub fn as_indexes(&self) -> Option<&[i32]> {
        match self {
            Value::Indexes(indexes) => Some(indexes),
            _ => None,
        }
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Cell(_) => "cell",
            Value::Variables(_) => "variables",
            Value::Indexes(_) => "indexes",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Cell(a), Value::Cell(b)) => a.ptr_eq(b),
            (Value::Variables(a), Value::Variables(b)) => a.ptr_eq(b),
            (Value::Indexes(a), Value::Indexes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Cell(cell) => cell.fmt(f),
            Value::Variables(view) => view.fmt(f),
            Value::Indexes(indexes) => f.debug_list().entries(indexes.iter()).finish(),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<StrongBox> for Value {
    fn from(cell: StrongBox) -> Self {
        Value::Cell(cell)
    }
}

impl From<VariablesRef> for Value {
    fn from(view: VariablesRef) -> Self {
        Value::Variables(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_compare_by_identity() {
        let cell = StrongBox::new(Value::Int(1));
        let same = Value::Cell(cell.clone());
        let other = Value::Cell(StrongBox::new(Value::Int(1)));
        assert_eq!(Value::Cell(cell), same);
        assert_ne!(same, other);
    }

    #[test]
    fn test_float_roundtrips_bits() {
        assert_eq!(Value::float(1.5), Value::Float(1.5f64.to_bits()));
        assert_eq!(format!("{:?}", Value::float(1.5)), "1.5");
    }

    #[test]
    fn test_accessors() {
        let indexes = Value::Indexes(Rc::from(vec![0, -1]));
        assert_eq!(indexes.as_indexes(), Some(&[0, -1][..]));
        assert!(indexes.as_cell().is_none());
        assert_eq!(indexes.type_name(), "indexes");
    }
}
