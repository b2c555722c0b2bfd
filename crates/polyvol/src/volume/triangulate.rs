//! Plain recursive triangulation.
//!
//! Each face is coned from its lowest vertex over the facets that avoid that
//! vertex. The apexes collected on the way down plus the remaining vertices of
//! a simplicial face form one full-dimensional simplex of the triangulation.

use tracing::debug;

use super::context::Run;
use crate::face::{VertexSet, VisitedFaces};
use crate::linalg::simplex_volume;

impl Run {
    /// `D!` times the total volume of the simplices under `face`, where
    /// `face` has dimension `level` and `D` is the polytope dimension.
    pub(crate) fn triangulate(&mut self, face: &VertexSet, level: usize) -> f64 {
        if level == 0 || face.len() <= level + 1 {
            return self.simplex_base(face);
        }
        let Some(apex) = face.first() else {
            return 0.0;
        };
        let mut visited = VisitedFaces::new();
        let mut sum = 0.0;
        for j in 0..self.poly.num_hyperplanes() {
            if self.poly.incidence().contains(apex, j) {
                continue;
            }
            let child = face.intersect_with_hyperplane(j, self.poly.incidence());
            if child.len() < level || !visited.insert(&child) {
                continue;
            }
            let Some(next) = child.first() else {
                continue;
            };
            if level == self.top_dim {
                debug!(hyperplane = j, vertices = child.len(), "top-level facet");
            }
            self.simplex.add(next);
            sum += self.triangulate(&child, level - 1);
            self.simplex.remove(next);
        }
        sum
    }

    fn simplex_base(&mut self, face: &VertexSet) -> f64 {
        let added: Vec<_> = face.iter().skip(1).filter(|&v| self.simplex.add(v)).collect();
        let v = simplex_volume(
            self.poly.vertices(),
            &self.simplex,
            self.cfg.pivoting,
            self.cfg.eps,
            self.cfg.verbose,
        );
        for id in added {
            self.simplex.remove(id);
        }
        self.record_partial(v);
        v
    }
}
