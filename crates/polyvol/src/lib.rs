//! Exact volume computation for convex polytopes in R^d.
//!
//! Layout (leaves first)
//! - `face`: ordered vertex sets, the combinatorial substrate of every face.
//! - `linalg`: pivoted Gaussian elimination (determinants, vertex systems).
//! - `ortho`: Householder bases and cone heights.
//! - `cache`: AVL face-volume memo.
//! - `volume`: the three algorithms and their common contract.
//!
//! Input is a `Polytope` carrying vertices, half-spaces and their incidence;
//! the crate does no hull or vertex enumeration of its own.

pub mod api;
pub mod cache;
pub mod cfg;
pub mod face;
pub mod linalg;
pub mod ortho;
pub mod polytope;
pub mod volume;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{Pivoting, VolumeCfg};
pub use polytope::{Hyperplane, Polytope, PolytopeError};
pub use volume::{Algorithm, VolumeError, VolumeReport};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{Pivoting, VolumeCfg};
    pub use crate::polytope::special;
    pub use crate::polytope::{Hyperplane, Polytope, VertexId};
    pub use crate::volume::{
        lawrence_sum, triangulate, triangulate_ortho, Algorithm, VolumeError, VolumeMethod,
        VolumeReport,
    };
    pub use nalgebra::{DMatrix, DVector};
}
