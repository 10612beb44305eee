//! src/model/path.rs
//! ============================================================================
//! # Structural field paths
//!
//! A field's position inside an entity is a short sequence of small integers
//! (one per nesting level). The tree those sequences describe is never built:
//! ordering paths lexicographically, with a prefix sorting before any of its
//! extensions, already yields depth-first display order.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One component of a structural path.
pub type PathPart = u8;

/// Width of a single component in the padded textual rendering.
pub const PADDED_PART_WIDTH: usize = 4;

/// Flat structural path of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(SmallVec<[PathPart; 8]>);

impl FieldPath {
    #[must_use]
    pub fn new(parts: &[PathPart]) -> Self {
        Self(SmallVec::from_slice(parts))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathPart] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every component right-aligned in a fixed-width column, e.g. `   0  12`.
    #[must_use]
    pub fn padded(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * PADDED_PART_WIDTH);
        for part in &self.0 {
            let _ = write!(out, "{part:>PADDED_PART_WIDTH$}");
        }
        out
    }
}

impl From<Vec<PathPart>> for FieldPath {
    fn from(parts: Vec<PathPart>) -> Self {
        Self(SmallVec::from_vec(parts))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{part}")?;
        }
        f.write_char(']')
    }
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_paths(&self.0, &other.0)
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order over structural paths.
///
/// Components are compared in lockstep over the shared prefix; the first
/// difference decides. Identical shared prefixes put the shorter path first,
/// so a parent always precedes its children.
#[must_use]
pub fn compare_paths(a: &[PathPart], b: &[PathPart]) -> Ordering {
    for (lhs, rhs) in a.iter().zip(b) {
        if lhs != rhs {
            return lhs.cmp(rhs);
        }
    }

    a.len().cmp(&b.len())
}

/// Stable sort of `entries` by their structural path.
///
/// Entries with identical paths keep their relative input order.
pub fn sort_by_path<T, F>(entries: &mut [T], path_of: F)
where
    F: Fn(&T) -> &FieldPath,
{
    entries.sort_by(|a, b| compare_paths(path_of(a).as_slice(), path_of(b).as_slice()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_short_paths() -> Vec<Vec<PathPart>> {
        let mut paths = vec![vec![]];
        for a in 0..3 {
            paths.push(vec![a]);
            for b in 0..3 {
                paths.push(vec![a, b]);
                for c in 0..2 {
                    paths.push(vec![a, b, c]);
                }
            }
        }
        paths
    }

    #[test]
    fn test_compare_is_reflexive() {
        for p in all_short_paths() {
            assert_eq!(compare_paths(&p, &p), Ordering::Equal, "{p:?}");
        }
    }

    #[test]
    fn test_prefix_sorts_before_extension() {
        assert_eq!(compare_paths(&[0], &[0, 0]), Ordering::Less);
        assert_eq!(compare_paths(&[3, 1], &[3, 1, 7, 2]), Ordering::Less);
        assert_eq!(compare_paths(&[3, 1, 7, 2], &[3, 1]), Ordering::Greater);
        assert_eq!(compare_paths(&[], &[0]), Ordering::Less);
    }

    #[test]
    fn test_first_difference_decides() {
        assert_eq!(compare_paths(&[0, 9, 9], &[1]), Ordering::Less);
        assert_eq!(compare_paths(&[2, 0], &[1, 5, 5]), Ordering::Greater);
        assert_eq!(compare_paths(&[4, 200], &[4, 13]), Ordering::Greater);
    }

    #[test]
    fn test_antisymmetric_and_transitive() {
        let paths = all_short_paths();
        for a in &paths {
            for b in &paths {
                assert_eq!(compare_paths(a, b), compare_paths(b, a).reverse());
                for c in &paths {
                    if compare_paths(a, b) == Ordering::Less
                        && compare_paths(b, c) == Ordering::Less
                    {
                        assert_eq!(compare_paths(a, c), Ordering::Less, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_yields_depth_first_order() {
        let mut paths: Vec<FieldPath> = vec![
            FieldPath::new(&[1]),
            FieldPath::new(&[0, 1]),
            FieldPath::new(&[0]),
            FieldPath::new(&[0, 0, 3]),
            FieldPath::new(&[0, 0]),
        ];
        sort_by_path(&mut paths, |p| p);

        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["[0]", "[0,0]", "[0,0,3]", "[0,1]", "[1]"]);
    }

    #[test]
    fn test_sort_is_stable_for_duplicates() {
        let mut entries = vec![
            (FieldPath::new(&[2]), "first"),
            (FieldPath::new(&[1]), "other"),
            (FieldPath::new(&[2]), "second"),
        ];
        sort_by_path(&mut entries, |(p, _)| p);

        let labels: Vec<&str> = entries.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, ["other", "first", "second"]);
    }

    #[test]
    fn test_padded_rendering() {
        assert_eq!(FieldPath::new(&[0, 12, 255]).padded(), "   0  12 255");
        assert_eq!(FieldPath::default().padded(), "");
    }
}
