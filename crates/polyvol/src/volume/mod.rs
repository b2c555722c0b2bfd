//! Exact volume of a convex polytope.
//!
//! Purpose
//! - Three interchangeable algorithms over the same input (`Polytope`):
//!   - `PlainTriangulation`: recursive boundary triangulation, one determinant
//!     per simplex.
//!   - `OrthoTriangulation`: the same recursion measured through cone heights,
//!     with face volumes memoised in an AVL cache.
//!   - `LawrenceFormula`: signed sum over vertices; simple polytopes only.
//!
//! Why this design
//! - Every computation owns a private `Run` (polytope copy, cache, counters),
//!   so separate computations share nothing.
//! - Degenerate pieces (singular simplices, rank-deficient faces) contribute 0.
//!   Only Lawrence's formula can fail, and then the whole computation fails.
//!
//! References
//! - B. Büeler, A. Enge, K. Fukuda, "Exact volume computation for polytopes:
//!   a practical study" (2000).

mod context;
mod lawrence;
mod ortho_tri;
mod stats;
mod triangulate;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cfg::VolumeCfg;
use crate::linalg::factorial;
use crate::polytope::{Polytope, VertexId};
use context::Run;

pub use stats::Stats;

/// Fatal conditions; all raised by Lawrence's formula at a specific vertex.
#[derive(Clone, Debug, PartialEq)]
pub enum VolumeError {
    /// The vertex lies on more than `d` hyperplanes.
    NonSimplicialVertex {
        vertex: VertexId,
        coords: Vec<f64>,
        planes: Vec<usize>,
    },
    /// The vertex lies on fewer than `d` hyperplanes (inconsistent input).
    UnderdeterminedVertex {
        vertex: VertexId,
        coords: Vec<f64>,
        planes: Vec<usize>,
    },
    /// The normals at the vertex are linearly dependent.
    SingularVertexSystem {
        vertex: VertexId,
        coords: Vec<f64>,
        planes: Vec<usize>,
    },
    /// The direction is (numerically) parallel to a face through the vertex.
    ZeroDenominator {
        vertex: VertexId,
        coords: Vec<f64>,
        value: f64,
    },
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonSimplicialVertex {
                vertex,
                coords,
                planes,
            } => write!(
                f,
                "vertex {vertex} at {coords:?} is not simple (on hyperplanes {planes:?}); \
                 use a triangulation"
            ),
            Self::UnderdeterminedVertex {
                vertex,
                coords,
                planes,
            } => write!(
                f,
                "vertex {vertex} at {coords:?} lies on too few hyperplanes ({planes:?})"
            ),
            Self::SingularVertexSystem {
                vertex,
                coords,
                planes,
            } => write!(
                f,
                "normals of hyperplanes {planes:?} at vertex {vertex} ({coords:?}) are dependent"
            ),
            Self::ZeroDenominator {
                vertex,
                coords,
                value,
            } => write!(
                f,
                "zero denominator {value:e} at vertex {vertex} ({coords:?}); change the random seed"
            ),
        }
    }
}

impl std::error::Error for VolumeError {}

/// Algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Triangulate,
    OrthoTriangulate,
    Lawrence,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::Triangulate, Self::OrthoTriangulate, Self::Lawrence];

    /// Short name used in logs and benchmark ids.
    pub fn label(self) -> &'static str {
        match self {
            Self::Triangulate => "rch",
            Self::OrthoTriangulate => "hot",
            Self::Lawrence => "lawnd",
        }
    }

    pub fn compute(self, poly: &Polytope, cfg: &VolumeCfg) -> Result<VolumeReport, VolumeError> {
        match self {
            Self::Triangulate => PlainTriangulation.compute(poly, cfg),
            Self::OrthoTriangulate => OrthoTriangulation.compute(poly, cfg),
            Self::Lawrence => LawrenceFormula.compute(poly, cfg),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown volume algorithm `{}` (expected rch, hot or lawnd)", self.0)
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rch" | "triangulate" => Ok(Self::Triangulate),
            "hot" | "ortho" | "triangulate-ortho" => Ok(Self::OrthoTriangulate),
            "lawnd" | "lawrence" => Ok(Self::Lawrence),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Volume plus what it took to get it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VolumeReport {
    pub algorithm: Algorithm,
    pub volume: f64,
    pub stats: Stats,
    /// Faces held by the cache at the end of the run.
    pub cache_nodes: usize,
}

/// Common contract of the volume algorithms.
pub trait VolumeMethod {
    fn algorithm(&self) -> Algorithm;

    fn compute(&self, poly: &Polytope, cfg: &VolumeCfg) -> Result<VolumeReport, VolumeError>;
}

fn start(algorithm: Algorithm, poly: &Polytope) {
    info!(
        algorithm = algorithm.label(),
        dim = poly.dim(),
        vertices = poly.num_vertices(),
        hyperplanes = poly.num_hyperplanes(),
        "volume computation started"
    );
}

fn finish(algorithm: Algorithm, volume: f64, run: Run) -> VolumeReport {
    info!(
        algorithm = algorithm.label(),
        volume,
        partial_volumes = run.stats.partial_volumes,
        cache_nodes = run.cache.len(),
        "volume computation finished"
    );
    VolumeReport {
        algorithm,
        volume,
        cache_nodes: run.cache.len(),
        stats: run.stats,
    }
}

/// Boundary triangulation with one determinant per simplex.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTriangulation;

impl PlainTriangulation {
    pub fn report(&self, poly: &Polytope, cfg: &VolumeCfg) -> VolumeReport {
        start(Algorithm::Triangulate, poly);
        let mut run = Run::new(poly, cfg).renumbered();
        let d = run.top_dim;
        let all = run.poly.all_vertices();
        if let Some(first) = all.first() {
            run.simplex.add(first);
        }
        let scaled = run.triangulate(&all, d);
        finish(Algorithm::Triangulate, scaled / factorial(d), run)
    }
}

impl VolumeMethod for PlainTriangulation {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Triangulate
    }

    fn compute(&self, poly: &Polytope, cfg: &VolumeCfg) -> Result<VolumeReport, VolumeError> {
        Ok(self.report(poly, cfg))
    }
}

/// Cone-height triangulation with a face-volume cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrthoTriangulation;

impl OrthoTriangulation {
    pub fn report(&self, poly: &Polytope, cfg: &VolumeCfg) -> VolumeReport {
        start(Algorithm::OrthoTriangulate, poly);
        let mut run = Run::new(poly, cfg).renumbered();
        let d = run.top_dim;
        let scale = run.poly.normalise_coordinates();
        let all = run.poly.all_vertices();
        let (scaled, _) = run.triangulate_ortho(&all, d);
        finish(Algorithm::OrthoTriangulate, scale * scaled / factorial(d), run)
    }
}

impl VolumeMethod for OrthoTriangulation {
    fn algorithm(&self) -> Algorithm {
        Algorithm::OrthoTriangulate
    }

    fn compute(&self, poly: &Polytope, cfg: &VolumeCfg) -> Result<VolumeReport, VolumeError> {
        Ok(self.report(poly, cfg))
    }
}

/// Lawrence's signed vertex sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct LawrenceFormula;

impl VolumeMethod for LawrenceFormula {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lawrence
    }

    fn compute(&self, poly: &Polytope, cfg: &VolumeCfg) -> Result<VolumeReport, VolumeError> {
        start(self.algorithm(), poly);
        let mut run = Run::new(poly, cfg);
        let volume = run.lawrence()?;
        Ok(finish(self.algorithm(), volume, run))
    }
}

/// Volume by plain triangulation.
pub fn triangulate(poly: &Polytope, cfg: &VolumeCfg) -> f64 {
    PlainTriangulation.report(poly, cfg).volume
}

/// Volume by cached cone-height triangulation.
pub fn triangulate_ortho(poly: &Polytope, cfg: &VolumeCfg) -> f64 {
    OrthoTriangulation.report(poly, cfg).volume
}

/// Volume by Lawrence's formula.
pub fn lawrence_sum(poly: &Polytope, cfg: &VolumeCfg) -> Result<f64, VolumeError> {
    LawrenceFormula.compute(poly, cfg).map(|r| r.volume)
}
