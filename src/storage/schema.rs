//! Relation schemas.

use std::fmt;

/// The column layout of a relation.
///
/// The operators only need column *positions* (sort column index, join
/// column pair); names exist for output schemas and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Create a schema from column names.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of columns.
    #[inline]
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// The name of column `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn column_name(&self, index: usize) -> &str {
        &self.columns[index]
    }

    /// Concatenate two schemas (left columns, then right columns).
    ///
    /// Mirrors [`Tuple::concat`]: the join's output schema.
    ///
    /// [`Tuple::concat`]: crate::storage::Tuple::concat
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut columns = Vec::with_capacity(self.columns.len() + other.columns.len());
        columns.extend_from_slice(&self.columns);
        columns.extend_from_slice(&other.columns);
        Schema { columns }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.columns.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_arity_and_names() {
        let schema = Schema::new(vec!["id", "name"]);
        assert_eq!(schema.arity(), 2);
        assert_eq!(schema.column_name(0), "id");
        assert_eq!(schema.column_name(1), "name");
    }

    #[test]
    fn test_schema_concat() {
        let left = Schema::new(vec!["a", "b"]);
        let right = Schema::new(vec!["c"]);
        let joined = left.concat(&right);
        assert_eq!(joined.arity(), 3);
        assert_eq!(format!("{}", joined), "(a, b, c)");
    }
}
