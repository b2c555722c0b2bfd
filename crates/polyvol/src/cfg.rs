//! Tolerances and run configuration.
//!
//! Policy
//! - Tolerances that callers never tune live here as constants.
//! - Everything a driver may want to vary per run is collected in `VolumeCfg`,
//!   a small `Copy` struct with sensible defaults.

use serde::{Deserialize, Serialize};

/// Singularity/degeneracy threshold for pivots, residual norms and volumes.
pub const EPS: f64 = 1e-10;
/// Tolerance for vertex/hyperplane incidence.
///
/// Deliberately looser than `EPS`: incidences computed from rounded input data
/// otherwise miss genuine contacts.
pub const INCIDENCE_EPS: f64 = 1e-6;
/// Recursion levels for which intermediate face volumes are cached by default.
pub const DEFAULT_STORAGE: usize = 20;
/// Default pivot magnitude accepted by `Pivoting::Threshold`.
pub const MIN_PIVOT: f64 = 0.5;
/// Growth increment of ordered face sets.
pub(crate) const GROW_STEP: usize = 5;
/// Emit a progress event every this many partial volumes.
pub(crate) const PROGRESS_EVERY: u64 = 100_000;

/// Pivot selection for Gaussian elimination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Pivoting {
    /// First row (from the diagonal down) whose entry exceeds `min_pivot` in
    /// absolute value; the largest entry seen is used if none does.
    Threshold { min_pivot: f64 },
    /// Row with the largest absolute entry in the pivot column.
    #[default]
    Partial,
    /// Largest absolute entry of the trailing square block. Only applies to
    /// pure determinant computations; systems with right-hand sides fall back
    /// to partial pivoting.
    Total,
}

/// Per-run configuration shared by all volume algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeCfg {
    /// How many recursion levels (counted from two fixed hyperplanes down) may
    /// store face volumes. `0` disables the cache, `usize::MAX` is unbounded.
    pub storage_level: usize,
    /// Seed of the objective direction drawn for Lawrence's formula.
    pub random_seed: u64,
    pub pivoting: Pivoting,
    /// Singularity/degeneracy threshold.
    pub eps: f64,
    /// Log singular matrices met by the elimination.
    pub verbose: bool,
}

impl Default for VolumeCfg {
    fn default() -> Self {
        Self {
            storage_level: DEFAULT_STORAGE,
            random_seed: 0,
            pivoting: Pivoting::default(),
            eps: EPS,
            verbose: false,
        }
    }
}

impl VolumeCfg {
    /// Same configuration with a different storage level.
    #[inline]
    pub fn with_storage_level(self, storage_level: usize) -> Self {
        Self {
            storage_level,
            ..self
        }
    }

    /// Same configuration with a different seed for Lawrence's formula.
    #[inline]
    pub fn with_seed(self, random_seed: u64) -> Self {
        Self {
            random_seed,
            ..self
        }
    }

    #[inline]
    pub fn with_pivoting(self, pivoting: Pivoting) -> Self {
        Self { pivoting, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = VolumeCfg::default();
        assert_eq!(cfg.storage_level, DEFAULT_STORAGE);
        assert_eq!(cfg.pivoting, Pivoting::Partial);
        assert_eq!(cfg.eps, EPS);
        assert!(!cfg.verbose);
    }

    #[test]
    fn cfg_survives_json() {
        let cfg = VolumeCfg::default()
            .with_storage_level(3)
            .with_seed(17)
            .with_pivoting(Pivoting::Threshold {
                min_pivot: MIN_PIVOT,
            });
        let text = serde_json::to_string(&cfg).unwrap();
        let back: VolumeCfg = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
