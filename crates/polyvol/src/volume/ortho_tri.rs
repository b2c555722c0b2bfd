//! Cached triangulation via cone heights.
//!
//! A face of dimension `level` is measured as Σ (child volume × distance from
//! the apex to the child's hull) over its facets avoiding the apex. Child
//! bases are extended by the apex direction, so only one orthonormalisation per
//! simplicial face is needed. Volumes of lower faces are memoised in
//! `FaceCache` when `should_cache` allows it.

use tracing::{debug, trace};

use super::context::Run;
use crate::cache::{should_cache, Lookup};
use crate::face::{VertexSet, VisitedFaces};
use crate::ortho::{extend_basis, orthonormal_basis, OrthoBasis};

impl Run {
    /// `level!` times the volume of `face`, with a basis of its hull.
    pub(crate) fn triangulate_ortho(
        &mut self,
        face: &VertexSet,
        level: usize,
    ) -> (f64, OrthoBasis) {
        let eps = self.cfg.eps;
        if level == 0 || face.len() <= level + 1 {
            let (basis, v) = orthonormal_basis(level, face, self.poly.vertices(), eps);
            self.record_partial(v);
            return (v, basis);
        }

        let mut slot = None;
        if should_cache(self.top_dim, level, self.cfg.storage_level) {
            match self.cache.lookup_or_reserve(level, face) {
                Lookup::Stored(v) => {
                    self.stats.record_retrieve(level);
                    trace!(level, vertices = face.len(), volume = v, "cache hit");
                    if v < eps {
                        return (0.0, OrthoBasis::new());
                    }
                    let (basis, _) = orthonormal_basis(level, face, self.poly.vertices(), eps);
                    return (v, basis);
                }
                Lookup::Reserved(s) => slot = Some(s),
            }
        }

        let mut total = 0.0;
        let mut basis = OrthoBasis::new();
        if let Some(apex) = face.first() {
            let mut visited = VisitedFaces::new();
            let mut max_dist = 0.0;
            for j in 0..self.poly.num_hyperplanes() {
                if self.poly.incidence().contains(apex, j) {
                    continue;
                }
                let child = face.intersect_with_hyperplane(j, self.poly.incidence());
                if child.len() < level || !visited.insert(&child) {
                    continue;
                }
                if level == self.top_dim {
                    debug!(hyperplane = j, vertices = child.len(), "top-level facet");
                }
                let (child_vol, mut child_basis) = self.triangulate_ortho(&child, level - 1);
                if child_vol.abs() <= eps {
                    continue;
                }
                let dist = extend_basis(
                    level,
                    &child,
                    &mut child_basis,
                    apex,
                    self.poly.vertices(),
                    eps,
                );
                total += child_vol * dist;
                if dist > max_dist {
                    max_dist = dist;
                    basis = child_basis;
                }
            }
        }

        if let Some(s) = slot {
            self.cache.store(s, total);
            self.stats.record_store(level);
        }
        (total, basis)
    }
}
