//! Faces as ordered vertex sets.
//!
//! Why this design
//! - A face is identified by its vertices. Keeping the ids strictly ascending
//!   makes equality a plain slice comparison and cache keys cheap to order.
//! - Intersecting with a hyperplane is a filter over an already sorted list,
//!   so the result is sorted without re-sorting. Every face reachable from
//!   `Polytope::all_vertices` through intersections therefore has a canonical
//!   representation.

use crate::cfg::GROW_STEP;
use crate::polytope::{Incidence, VertexId};

/// Duplicate-free set of vertex ids, ascending.
///
/// Invariants:
/// - `ids[i] < ids[i + 1]` for all `i`.
/// - Cloning copies ids only; vertices stay owned by the polytope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexSet {
    ids: Vec<VertexId>,
}

impl VertexSet {
    #[inline]
    pub fn new() -> Self {
        Self {
            ids: Vec::with_capacity(GROW_STEP),
        }
    }

    /// Wrap ids that are already strictly ascending; `None` otherwise.
    pub fn from_sorted_ids(ids: Vec<VertexId>) -> Option<Self> {
        let set = Self { ids };
        set.is_strictly_ascending().then_some(set)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Smallest id; the apex used when coning over this face.
    #[inline]
    pub fn first(&self) -> Option<VertexId> {
        self.ids.first().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[VertexId] {
        &self.ids
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.ids.iter().copied()
    }

    #[inline]
    pub fn contains(&self, e: VertexId) -> bool {
        self.ids.binary_search(&e).is_ok()
    }

    /// Insert `e` at its sorted position. Returns false if it was already present.
    pub fn add(&mut self, e: VertexId) -> bool {
        match self.ids.binary_search(&e) {
            Ok(_) => false,
            Err(pos) => {
                if self.ids.len() == self.ids.capacity() {
                    self.ids.reserve_exact(GROW_STEP);
                }
                self.ids.insert(pos, e);
                true
            }
        }
    }

    /// Remove `e`. Returns whether it was present.
    pub fn remove(&mut self, e: VertexId) -> bool {
        match self.ids.binary_search(&e) {
            Ok(pos) => {
                self.ids.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The elements of `self` lying on hyperplane `j`, in the same order.
    pub fn intersect_with_hyperplane(&self, j: usize, incidence: &Incidence) -> VertexSet {
        let ids: Vec<VertexId> = self
            .ids
            .iter()
            .copied()
            .filter(|&v| incidence.contains(v, j))
            .collect();
        VertexSet { ids }
    }

    /// Check the ordering invariant (used by tests and debug assertions).
    pub fn is_strictly_ascending(&self) -> bool {
        self.ids.windows(2).all(|w| w[0] < w[1])
    }
}

impl FromIterator<VertexId> for VertexSet {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        let mut set = VertexSet::new();
        for e in iter {
            set.add(e);
        }
        set
    }
}

/// Faces already branched into by the current recursion call.
///
/// Several hyperplanes may cut out the same face (degenerate vertices); the
/// list makes sure each child is visited once per call. It is local to one
/// call and dropped with it.
#[derive(Debug, Default)]
pub struct VisitedFaces {
    faces: Vec<VertexSet>,
}

impl VisitedFaces {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, face: &VertexSet) -> bool {
        self.faces.iter().any(|f| f == face)
    }

    /// Record `face`; returns false if it had been recorded before.
    pub fn insert(&mut self, face: &VertexSet) -> bool {
        if self.contains(face) {
            return false;
        }
        self.faces.push(face.clone());
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn ids(set: &VertexSet) -> Vec<usize> {
        set.iter().map(VertexId::index).collect()
    }

    #[test]
    fn add_keeps_order_and_rejects_duplicates() {
        let mut s = VertexSet::new();
        for i in [5, 1, 9, 3, 7, 1, 5] {
            s.add(VertexId(i));
        }
        assert_eq!(ids(&s), vec![1, 3, 5, 7, 9]);
        assert!(!s.add(VertexId(3)));
        assert_eq!(s.first(), Some(VertexId(1)));
    }

    #[test]
    fn remove_reports_presence() {
        let mut s: VertexSet = [2, 4, 6].into_iter().map(VertexId).collect();
        assert!(s.remove(VertexId(4)));
        assert!(!s.remove(VertexId(4)));
        assert!(!s.remove(VertexId(5)));
        assert_eq!(ids(&s), vec![2, 6]);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.first(), None);
    }

    #[test]
    fn from_sorted_ids_checks_order() {
        let ok = VertexSet::from_sorted_ids(vec![VertexId(0), VertexId(3)]).unwrap();
        assert!(ok.contains(VertexId(3)));
        assert!(VertexSet::from_sorted_ids(vec![VertexId(3), VertexId(0)]).is_none());
        assert!(VertexSet::from_sorted_ids(vec![VertexId(1), VertexId(1)]).is_none());
    }

    #[test]
    fn clone_is_independent() {
        let mut s: VertexSet = (0..6).map(VertexId).collect();
        let copy = s.clone();
        s.remove(VertexId(2));
        s.add(VertexId(10));
        assert_eq!(ids(&copy), vec![0, 1, 2, 3, 4, 5]);
        assert_ne!(copy, s);
    }

    #[test]
    fn intersection_filters_in_order() {
        let inc = Incidence::from_rows(vec![
            vec![true, false],
            vec![false, true],
            vec![true, true],
            vec![true, false],
        ])
        .unwrap();
        let all: VertexSet = (0..4).map(VertexId).collect();
        assert_eq!(ids(&all.intersect_with_hyperplane(0, &inc)), vec![0, 2, 3]);
        assert_eq!(ids(&all.intersect_with_hyperplane(1, &inc)), vec![1, 2]);
        assert!(VertexSet::new().intersect_with_hyperplane(0, &inc).is_empty());
    }

    #[test]
    fn visited_faces_dedup() {
        let a: VertexSet = [1, 2].into_iter().map(VertexId).collect();
        let b: VertexSet = [1, 3].into_iter().map(VertexId).collect();
        let mut seen = VisitedFaces::new();
        assert!(seen.insert(&a));
        assert!(seen.insert(&b));
        assert!(!seen.insert(&a.clone()));
        assert_eq!(seen.len(), 2);
    }

    proptest! {
        #[test]
        fn random_edits_match_btreeset(
            ops in prop::collection::vec((any::<bool>(), 0usize..40), 0..200)
        ) {
            let mut set = VertexSet::new();
            let mut model = BTreeSet::new();
            for (is_add, id) in ops {
                if is_add {
                    prop_assert_eq!(set.add(VertexId(id)), model.insert(id));
                } else {
                    prop_assert_eq!(set.remove(VertexId(id)), model.remove(&id));
                }
                prop_assert!(set.is_strictly_ascending());
            }
            prop_assert_eq!(ids(&set), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn intersections_stay_sorted(
            rows in prop::collection::vec(prop::collection::vec(any::<bool>(), 4), 1..30),
            picks in prop::collection::vec(0usize..4, 1..4),
        ) {
            let inc = Incidence::from_rows(rows.clone()).unwrap();
            let mut face: VertexSet = (0..rows.len()).map(VertexId).collect();
            for j in picks {
                let next = face.intersect_with_hyperplane(j, &inc);
                prop_assert!(next.is_strictly_ascending());
                prop_assert!(next.iter().all(|v| face.contains(v) && inc.contains(v, j)));
                face = next;
            }
        }
    }
}
