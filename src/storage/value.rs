//! Column values.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single column value.
///
/// Values are totally ordered so they can serve as sort keys and B+Tree
/// keys directly. The derived ordering compares across variants by variant
/// first (`Int < Text`); within one relation a column holds a single variant,
/// so only the within-variant order is ever observed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// UTF-8 string.
    Text(String),
}

impl Value {
    /// Reduce this value's hash to a bucket index in `0..bucket_count`.
    ///
    /// This is the hash function of the partition phase: both join sides are
    /// reduced with the same modulus, which is what guarantees that matching
    /// tuples land in the same bucket index.
    ///
    /// # Panics
    /// Panics if `bucket_count` is zero.
    pub fn bucket(&self, bucket_count: usize) -> usize {
        assert!(bucket_count > 0, "bucket_count must be > 0");
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        (hasher.finish() % bucket_count as u64) as usize
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}
