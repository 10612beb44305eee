//! src/model/snapshot.rs
//! ============================================================
//! Immutable entry lists produced once per tick.
//!
//! A new tick always produces a new allocation, never an in-place
//! mutation, so "did the data change" is answered by pointer
//! identity alone ([`Snapshot::same_as`]).

use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct Snapshot<T>(Arc<[T]>);

impl<T> Snapshot<T> {
    #[must_use]
    pub fn new(entries: Vec<T>) -> Self {
        Self(Arc::from(entries))
    }

    /// Reference identity, not element equality.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

/// Identity comparison for optional snapshots: two absent lists are the same.
#[must_use]
pub fn same_snapshot<T>(a: Option<&Snapshot<T>>, b: Option<&Snapshot<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_as(b),
        _ => false,
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(entries: Vec<T>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_by_reference() {
        let a = Snapshot::new(vec![1, 2, 3]);
        let b = Snapshot::new(vec![1, 2, 3]);
        let a2 = a.clone();

        assert!(a.same_as(&a2));
        assert!(!a.same_as(&b));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_optional_identity() {
        let a = Snapshot::new(vec!["x"]);
        assert!(same_snapshot::<u8>(None, None));
        assert!(same_snapshot(Some(&a), Some(&a.clone())));
        assert!(!same_snapshot(Some(&a), None));
    }
}
