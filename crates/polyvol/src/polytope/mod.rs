//! Convex polytopes in R^d given by vertices, hyperplanes and their incidence.
//!
//! Assumptions and conventions
//! - Half-spaces use `a·x <= b`; neither `a` nor `b` is normalized.
//! - Both representations are required: the triangulations walk the face
//!   lattice through the incidence relation, Lawrence's formula needs the
//!   normals at every vertex.
//! - Incidence uses the loose tolerance `INCIDENCE_EPS`; it is computed once
//!   and only row order changes afterwards (vertex renumbering).
//! - Vertex ids equal positions in the vertex array at all times.

mod incidence;
pub mod special;
mod types;

pub use incidence::Incidence;
pub use types::{Hyperplane, Polytope, PolytopeError, Vertex, VertexId};
