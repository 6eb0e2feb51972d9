//! Tuples and tuple references.

use std::fmt;

use crate::common::BlockId;
use crate::storage::Value;

/// An ordered sequence of column values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    /// Create a tuple from column values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of columns.
    #[inline]
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// The value in column `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn value(&self, index: usize) -> &Value {
        &self.values[index]
    }

    /// All column values, in order.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Concatenate two tuples into one (left columns, then right columns).
    ///
    /// This is how the join materializes a matching pair.
    pub fn concat(&self, other: &Tuple) -> Tuple {
        let mut values = Vec::with_capacity(self.values.len() + other.values.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&other.values);
        Tuple { values }
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Tuple::new(values)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// A reference to a tuple slot inside a disk block.
///
/// This is the value type stored by the B+Tree index: the key maps to the
/// location of the indexed tuple, not to the tuple itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TupleRef {
    /// The block holding the tuple.
    pub block: BlockId,
    /// The tuple's slot within that block.
    pub slot: usize,
}

impl TupleRef {
    /// Create a new tuple reference.
    #[inline]
    pub fn new(block: BlockId, slot: usize) -> Self {
        Self { block, slot }
    }
}

impl fmt::Display for TupleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.block, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_accessors() {
        let t = Tuple::new(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(t.arity(), 2);
        assert_eq!(t.value(0), &Value::Int(1));
        assert_eq!(t.value(1), &Value::Text("x".into()));
    }

    #[test]
    fn test_tuple_concat_keeps_field_order() {
        let left = Tuple::new(vec![Value::Int(1), Value::Int(2)]);
        let right = Tuple::new(vec![Value::Int(3)]);
        let joined = left.concat(&right);
        assert_eq!(
            joined.values(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_tuple_ref_display() {
        let r = TupleRef::new(BlockId::new(3), 5);
        assert_eq!(format!("{}", r), "Block(3)[5]");
    }
}
