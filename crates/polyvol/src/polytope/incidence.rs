//! Vertex × hyperplane incidence.

use super::types::{Hyperplane, Vertex, VertexId};

/// Dense incidence matrix: `rows[v][j]` is true iff vertex `v` lies on hyperplane `j`.
///
/// Rows are indexed by vertex id, so renumbering vertices only permutes rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Incidence {
    rows: Vec<Vec<bool>>,
    num_hyperplanes: usize,
}

impl Incidence {
    /// `|b_j - a_j · v| < eps` for every vertex/hyperplane pair.
    pub fn compute(vertices: &[Vertex], hyperplanes: &[Hyperplane], eps: f64) -> Self {
        let rows = vertices
            .iter()
            .map(|v| {
                hyperplanes
                    .iter()
                    .map(|h| h.is_incident(&v.coords, eps))
                    .collect()
            })
            .collect();
        Self {
            rows,
            num_hyperplanes: hyperplanes.len(),
        }
    }

    /// Wrap a precomputed relation. Returns `None` for ragged rows.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Option<Self> {
        let num_hyperplanes = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != num_hyperplanes) {
            return None;
        }
        Some(Self {
            rows,
            num_hyperplanes,
        })
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_hyperplanes(&self) -> usize {
        self.num_hyperplanes
    }

    #[inline]
    pub fn contains(&self, v: VertexId, hyperplane: usize) -> bool {
        self.rows[v.index()][hyperplane]
    }

    /// Number of hyperplanes through `v`.
    pub fn degree(&self, v: VertexId) -> usize {
        self.rows[v.index()].iter().filter(|&&b| b).count()
    }

    /// Indices of the hyperplanes through `v`, ascending.
    pub fn planes_of(&self, v: VertexId) -> impl Iterator<Item = usize> + '_ {
        self.rows[v.index()]
            .iter()
            .enumerate()
            .filter_map(|(j, &b)| b.then_some(j))
    }

    /// New row `i` is old row `order[i]`. `order` must be a permutation.
    pub(crate) fn permute_rows(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows.len());
        let mut old: Vec<Option<Vec<bool>>> =
            std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.rows = order.iter().filter_map(|&i| old[i].take()).collect();
    }
}
