//! Curated surface for drivers (benchmarks, examples, future front ends).
//!
//! Important
//! - Not a stability promise; names follow the modules and may move with them.
//! - The kernels are re-exported for callers that want to reuse them on their
//!   own matrices and faces.

// Input
pub use crate::polytope::special::{
    axis_box, cross_polytope, cube_with_cut_corner, hypercube, simplex_from_vertices,
    standard_simplex,
};
pub use crate::polytope::{Hyperplane, Incidence, Polytope, PolytopeError, Vertex, VertexId};
// Configuration
pub use crate::cfg::{Pivoting, VolumeCfg, DEFAULT_STORAGE, EPS, INCIDENCE_EPS, MIN_PIVOT};
// Kernels
pub use crate::cache::{should_cache, FaceCache, FaceKey, Lookup, SlotId};
pub use crate::face::{VertexSet, VisitedFaces};
pub use crate::linalg::{factorial, reduce_and_invert, simplex_volume, AugmentedMatrix};
pub use crate::ortho::{extend_basis, orthonormal_basis, OrthoBasis};
// Algorithms
pub use crate::volume::{
    lawrence_sum, triangulate, triangulate_ortho, Algorithm, LawrenceFormula, OrthoTriangulation,
    ParseAlgorithmError, PlainTriangulation, Stats, VolumeError, VolumeMethod, VolumeReport,
};
