//! Per-run counters.

use serde::Serialize;

use crate::cfg::PROGRESS_EVERY;

/// Work done by one volume computation.
///
/// `stored_per_level[l]` / `retrieved_per_level[l]` count cache writes and hits
/// for faces of dimension `l`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    /// Simplices (triangulations) or vertex terms (Lawrence) evaluated.
    pub partial_volumes: u64,
    pub smallest_partial: Option<f64>,
    pub biggest_partial: Option<f64>,
    /// Vertex terms below zero in Lawrence's sum.
    pub negative_terms: u64,
    pub stored_per_level: Vec<u64>,
    pub retrieved_per_level: Vec<u64>,
}

impl Stats {
    pub fn for_dim(dim: usize) -> Self {
        Self {
            stored_per_level: vec![0; dim + 1],
            retrieved_per_level: vec![0; dim + 1],
            ..Self::default()
        }
    }

    /// Count a partial volume; returns true when a progress event is due.
    pub(crate) fn record_partial(&mut self, v: f64) -> bool {
        self.partial_volumes += 1;
        if v < 0.0 {
            self.negative_terms += 1;
        }
        let a = v.abs();
        self.smallest_partial = Some(self.smallest_partial.map_or(a, |s| s.min(a)));
        self.biggest_partial = Some(self.biggest_partial.map_or(a, |b| b.max(a)));
        self.partial_volumes % PROGRESS_EVERY == 0
    }

    pub(crate) fn record_store(&mut self, level: usize) {
        if let Some(n) = self.stored_per_level.get_mut(level) {
            *n += 1;
        }
    }

    pub(crate) fn record_retrieve(&mut self, level: usize) {
        if let Some(n) = self.retrieved_per_level.get_mut(level) {
            *n += 1;
        }
    }

    pub fn cache_stores(&self) -> u64 {
        self.stored_per_level.iter().sum()
    }

    pub fn cache_hits(&self) -> u64 {
        self.retrieved_per_level.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_use_magnitudes() {
        let mut s = Stats::for_dim(3);
        for v in [2.0, -0.5, 7.0] {
            s.record_partial(v);
        }
        assert_eq!(s.partial_volumes, 3);
        assert_eq!(s.negative_terms, 1);
        assert_eq!(s.smallest_partial, Some(0.5));
        assert_eq!(s.biggest_partial, Some(7.0));
    }

    #[test]
    fn level_counters_ignore_out_of_range() {
        let mut s = Stats::for_dim(2);
        s.record_store(0);
        s.record_store(0);
        s.record_retrieve(1);
        s.record_store(9);
        assert_eq!(s.cache_stores(), 2);
        assert_eq!(s.cache_hits(), 1);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["stored_per_level"][0], 2);
    }
}
