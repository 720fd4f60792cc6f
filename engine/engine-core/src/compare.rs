//! Ordering and hashing projections
//!
//! Games expose a single three-way comparison per value type. Hosts usually
//! ask relational questions (`<`, `==`, ...) and expect signed hashes where
//! `-1` is reserved, so both are projected here.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash value reserved by hosts to signal an error
pub const HASH_RESERVED: isize = -1;

/// Replacement for [`HASH_RESERVED`]
pub const HASH_SUBSTITUTE: isize = -2;

/// The six relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl Relation {
    /// Whether the relation holds for a three-way comparison result
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Relation::Lt => ordering == Ordering::Less,
            Relation::Le => ordering != Ordering::Greater,
            Relation::Eq => ordering == Ordering::Equal,
            Relation::Ne => ordering != Ordering::Equal,
            Relation::Gt => ordering == Ordering::Greater,
            Relation::Ge => ordering != Ordering::Less,
        }
    }
}

/// Reinterpret a native hash as a host hash, avoiding the reserved value
#[inline]
pub fn project_hash(hash: u64) -> isize {
    match hash as isize {
        HASH_RESERVED => HASH_SUBSTITUTE,
        h => h,
    }
}

/// Deterministic hash of any `Hash` value
///
/// Uses `DefaultHasher` with its fixed keys, so equal values hash equally
/// within one build. The algorithm may change between Rust releases, so the
/// result must not be persisted.
pub fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
