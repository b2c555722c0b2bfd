//! State owned by one volume computation.

use tracing::info;

use super::stats::Stats;
use crate::cache::FaceCache;
use crate::cfg::VolumeCfg;
use crate::face::VertexSet;
use crate::polytope::Polytope;

/// Working copy of the polytope plus everything the recursion shares.
///
/// One `Run` per computation; it is dropped (cache included) when the entry
/// point returns.
pub(crate) struct Run {
    pub(crate) poly: Polytope,
    pub(crate) cfg: VolumeCfg,
    pub(crate) cache: FaceCache,
    pub(crate) stats: Stats,
    /// Simplex being assembled by the plain triangulation.
    pub(crate) simplex: VertexSet,
    pub(crate) top_dim: usize,
}

impl Run {
    pub(crate) fn new(poly: &Polytope, cfg: &VolumeCfg) -> Self {
        let top_dim = poly.dim();
        Self {
            poly: poly.clone(),
            cfg: *cfg,
            cache: FaceCache::new(),
            stats: Stats::for_dim(top_dim),
            simplex: VertexSet::new(),
            top_dim,
        }
    }

    /// Renumber vertices so that degenerate ones become apexes early.
    pub(crate) fn renumbered(mut self) -> Self {
        self.poly.renumber_by_degeneracy();
        self
    }

    pub(crate) fn record_partial(&mut self, v: f64) {
        if self.stats.record_partial(v) {
            info!(
                partial_volumes = self.stats.partial_volumes,
                cache_nodes = self.cache.len(),
                "progress"
            );
        }
    }
}
