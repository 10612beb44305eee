//! src/filter/view.rs
//! ============================================================================
//! # Filtered views over snapshots
//!
//! A [`FilteredView`] never copies entries: it is the source snapshot plus,
//! when a predicate was applied, the positions that passed. An unfiltered
//! view shares the very same snapshot allocation as its input.

use std::sync::Arc;

use crate::model::entries::SearchKey;
use crate::model::snapshot::Snapshot;
use crate::search::predicate::SearchPredicate;

#[derive(Debug)]
pub struct FilteredView<T> {
    source: Snapshot<T>,
    indices: Option<Arc<[usize]>>,
}

impl<T> Clone for FilteredView<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl<T> FilteredView<T> {
    /// Identity view: every entry of `source`, in order.
    #[must_use]
    pub const fn unfiltered(source: Snapshot<T>) -> Self {
        Self {
            source,
            indices: None,
        }
    }

    /// `indices` must be strictly increasing positions into `source`.
    #[must_use]
    pub fn from_indices(source: Snapshot<T>, indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().is_none_or(|&last| last < source.len()));

        Self {
            source,
            indices: Some(Arc::from(indices)),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Snapshot<T> {
        &self.source
    }

    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.indices.is_none()
    }

    /// Number of visible entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.as_ref().map_or(self.source.len(), |idx| idx.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries in the underlying snapshot.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.source.len()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&T> {
        match &self.indices {
            None => self.source.get(position),
            Some(idx) => idx.get(position).and_then(|&i| self.source.get(i)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |position| self.get(position))
    }

    /// Visible entries in `range`, clamped to the view.
    pub fn window(&self, range: std::ops::Range<usize>) -> impl Iterator<Item = (usize, &T)> + '_ {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        (start..end).filter_map(move |position| self.get(position).map(|e| (position, e)))
    }

    /// Position of the first visible entry satisfying `pred`.
    pub fn position_of<P>(&self, mut pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|entry| pred(entry))
    }
}

/// Applies `predicate` to `entries`.
///
/// An absent predicate returns the input unchanged (same snapshot
/// allocation, same order). An empty input always yields an empty view.
pub fn apply<T: SearchKey>(
    entries: &Snapshot<T>,
    predicate: Option<&SearchPredicate>,
) -> FilteredView<T> {
    let Some(predicate) = predicate else {
        return FilteredView::unfiltered(entries.clone());
    };

    let indices = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| predicate.matches(entry.search_key()))
        .map(|(i, _)| i)
        .collect();

    FilteredView::from_indices(entries.clone(), indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{predicate::compile, query::FilterQuery};

    #[derive(Debug, Clone, PartialEq)]
    struct Named(&'static str);

    impl SearchKey for Named {
        fn search_key(&self) -> &str {
            self.0
        }
    }

    fn names(view: &FilteredView<Named>) -> Vec<&'static str> {
        view.iter().map(|n| n.0).collect()
    }

    #[test]
    fn test_absent_predicate_is_identity() {
        let snap = Snapshot::new(vec![Named("b"), Named("a"), Named("c")]);
        let view = apply(&snap, None);

        assert!(view.is_unfiltered());
        assert!(view.source().same_as(&snap));
        assert_eq!(names(&view), ["b", "a", "c"]);
    }

    #[test]
    fn test_predicate_keeps_order() {
        let snap = Snapshot::new(vec![Named("Alpha"), Named("beta"), Named("ALPS")]);
        let pred = compile(&FilterQuery::new("al")).unwrap();
        let view = apply(&snap, pred.as_ref());

        assert_eq!(names(&view), ["Alpha", "ALPS"]);
        assert_eq!(view.len(), 2);
        assert_eq!(view.total_len(), 3);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let snap: Snapshot<Named> = Snapshot::new(Vec::new());
        let pred = compile(&FilterQuery::new("x")).unwrap();

        assert!(apply(&snap, pred.as_ref()).is_empty());
        assert!(apply(&snap, None).is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let snap = Snapshot::new(vec![Named("one"), Named("two"), Named("three")]);
        let pred = compile(&FilterQuery::new("o")).unwrap();

        let first = apply(&snap, pred.as_ref());
        let second = apply(&snap, pred.as_ref());
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_window_is_clamped() {
        let snap = Snapshot::new(vec![Named("a"), Named("b"), Named("c")]);
        let view = FilteredView::from_indices(snap, vec![0, 2]);

        let window: Vec<(usize, &str)> = view.window(1..10).map(|(i, n)| (i, n.0)).collect();
        assert_eq!(window, [(1, "c")]);
        assert_eq!(view.window(5..9).count(), 0);
        assert_eq!(view.position_of(|n| n.0 == "c"), Some(1));
    }
}
