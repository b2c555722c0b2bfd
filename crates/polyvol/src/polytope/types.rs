//! Core input types: vertices, half-spaces and the polytope that owns them.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use super::incidence::Incidence;
use crate::cfg::INCIDENCE_EPS;
use crate::face::VertexSet;

/// Vertex identifier; the position of the vertex in its `Polytope`.
///
/// Ids are only compared and ordered. They define the ascending order of every
/// face and the ordering of cache keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A vertex of the polytope in R^d.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub id: VertexId,
    pub coords: DVector<f64>,
}

/// Closed half-space `a · x <= b` in R^d.
///
/// Invariants:
/// - `a` is not normalized; `b` is any finite real.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperplane {
    pub a: DVector<f64>,
    pub b: f64,
}

impl Hyperplane {
    #[inline]
    pub fn new(a: DVector<f64>, b: f64) -> Self {
        Self { a, b }
    }

    /// Build from a row `[b, -a_1, ..., -a_d]`, i.e. the inequality
    /// `b - a · x >= 0` used by H-representation files.
    pub fn from_ine_row(row: &[f64]) -> Option<Self> {
        let (&b, rest) = row.split_first()?;
        if rest.is_empty() {
            return None;
        }
        let a = DVector::from_iterator(rest.len(), rest.iter().map(|x| -x));
        Some(Self { a, b })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.len()
    }

    /// `b - a · x`; non-negative inside the half-space.
    #[inline]
    pub fn slack(&self, x: &DVector<f64>) -> f64 {
        self.b - self.a.dot(x)
    }

    #[inline]
    pub fn satisfies(&self, x: &DVector<f64>, eps: f64) -> bool {
        self.slack(x) >= -eps
    }

    #[inline]
    pub fn is_incident(&self, x: &DVector<f64>, eps: f64) -> bool {
        self.slack(x).abs() < eps
    }
}

/// Errors raised while assembling a `Polytope`.
#[derive(Debug, Clone, PartialEq)]
pub enum PolytopeError {
    /// The ambient dimension must be at least one.
    ZeroDimension,
    /// A vertex has the wrong number of coordinates.
    CoordinateLength {
        vertex: usize,
        expected: usize,
        found: usize,
    },
    /// A hyperplane normal has the wrong length.
    NormalLength {
        hyperplane: usize,
        expected: usize,
        found: usize,
    },
    /// A full-dimensional polytope needs at least d+1 vertices.
    TooFewVertices { dim: usize, found: usize },
    /// A bounded polytope needs at least d+1 hyperplanes.
    TooFewHyperplanes { dim: usize, found: usize },
    /// A coordinate or coefficient is NaN or infinite.
    NonFinite { what: &'static str, index: usize },
    /// A precomputed incidence matrix does not match the vertex/hyperplane counts.
    IncidenceShape {
        vertices: usize,
        hyperplanes: usize,
    },
}

impl fmt::Display for PolytopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolytopeError::ZeroDimension => write!(f, "polytope dimension must be at least 1"),
            PolytopeError::CoordinateLength {
                vertex,
                expected,
                found,
            } => write!(
                f,
                "vertex {vertex} has {found} coordinates, expected {expected}"
            ),
            PolytopeError::NormalLength {
                hyperplane,
                expected,
                found,
            } => write!(
                f,
                "hyperplane {hyperplane} has {found} coefficients, expected {expected}"
            ),
            PolytopeError::TooFewVertices { dim, found } => write!(
                f,
                "a {dim}-dimensional polytope needs at least {} vertices, got {found}",
                dim + 1
            ),
            PolytopeError::TooFewHyperplanes { dim, found } => write!(
                f,
                "a bounded {dim}-dimensional polytope needs at least {} hyperplanes, got {found}",
                dim + 1
            ),
            PolytopeError::NonFinite { what, index } => {
                write!(f, "{what} {index} contains a non-finite value")
            }
            PolytopeError::IncidenceShape {
                vertices,
                hyperplanes,
            } => write!(
                f,
                "incidence matrix does not match {vertices} vertices and {hyperplanes} hyperplanes"
            ),
        }
    }
}

impl std::error::Error for PolytopeError {}

/// Convex polytope in R^d given by both representations plus their incidence.
///
/// Invariants:
/// - `vertices[i].id == VertexId(i)`.
/// - Row `i` of `incidence` belongs to `vertices[i]`.
/// - All coordinate and normal vectors have length `dim`.
#[derive(Clone, Debug)]
pub struct Polytope {
    dim: usize,
    vertices: Vec<Vertex>,
    hyperplanes: Vec<Hyperplane>,
    incidence: Incidence,
}

impl Polytope {
    /// Validate the input and compute the incidence with `INCIDENCE_EPS`.
    pub fn new(
        vertices: Vec<DVector<f64>>,
        hyperplanes: Vec<Hyperplane>,
    ) -> Result<Self, PolytopeError> {
        Self::with_incidence_eps(vertices, hyperplanes, INCIDENCE_EPS)
    }

    pub fn with_incidence_eps(
        vertices: Vec<DVector<f64>>,
        hyperplanes: Vec<Hyperplane>,
        eps: f64,
    ) -> Result<Self, PolytopeError> {
        let (dim, vertices) = validate(vertices, &hyperplanes)?;
        let incidence = Incidence::compute(&vertices, &hyperplanes, eps);
        Ok(Self {
            dim,
            vertices,
            hyperplanes,
            incidence,
        })
    }

    /// Use an incidence relation computed elsewhere (rows = vertices in input order).
    pub fn with_incidence(
        vertices: Vec<DVector<f64>>,
        hyperplanes: Vec<Hyperplane>,
        incidence: Incidence,
    ) -> Result<Self, PolytopeError> {
        let (dim, vertices) = validate(vertices, &hyperplanes)?;
        if incidence.num_vertices() != vertices.len()
            || incidence.num_hyperplanes() != hyperplanes.len()
        {
            return Err(PolytopeError::IncidenceShape {
                vertices: vertices.len(),
                hyperplanes: hyperplanes.len(),
            });
        }
        Ok(Self {
            dim,
            vertices,
            hyperplanes,
            incidence,
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[inline]
    pub fn hyperplanes(&self) -> &[Hyperplane] {
        &self.hyperplanes
    }

    #[inline]
    pub fn incidence(&self) -> &Incidence {
        &self.incidence
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_hyperplanes(&self) -> usize {
        self.hyperplanes.len()
    }

    /// The face of dimension d: all vertices.
    pub fn all_vertices(&self) -> VertexSet {
        self.vertices.iter().map(|v| v.id).collect()
    }

    /// Renumber vertices so that those on more hyperplanes get lower ids.
    ///
    /// Triangulations cone from the lowest vertex of each face; starting from
    /// highly degenerate vertices yields fewer, larger simplices. The sort is
    /// stable and incidence rows move with their vertices.
    pub fn renumber_by_degeneracy(&mut self) {
        let mut order: Vec<usize> = (0..self.vertices.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.incidence.degree(VertexId(i))));
        let mut old: Vec<Option<Vertex>> = std::mem::take(&mut self.vertices)
            .into_iter()
            .map(Some)
            .collect();
        self.vertices = order
            .iter()
            .enumerate()
            .filter_map(|(new_idx, &old_idx)| {
                old[old_idx].take().map(|mut v| {
                    v.id = VertexId(new_idx);
                    v
                })
            })
            .collect();
        self.incidence.permute_rows(&order);
    }

    /// Scale every axis so that all vertex coordinates lie in `[-1, 1]`.
    ///
    /// Hyperplane normals are rescaled so that incidences stay valid. Returns
    /// the product of the per-axis factors, i.e. the factor by which volumes
    /// of the scaled polytope must be multiplied.
    pub fn normalise_coordinates(&mut self) -> f64 {
        let mut volume_factor = 1.0;
        for axis in 0..self.dim {
            let scale = self
                .vertices
                .iter()
                .map(|v| v.coords[axis].abs())
                .fold(0.0_f64, f64::max);
            // A flat axis means a flat polytope; leave it alone, the volume is 0 anyway.
            if scale <= 0.0 {
                continue;
            }
            volume_factor *= scale;
            for v in &mut self.vertices {
                v.coords[axis] /= scale;
            }
            for h in &mut self.hyperplanes {
                h.a[axis] *= scale;
            }
        }
        volume_factor
    }

    /// Push-forward under the invertible affine map `y = M x + t`.
    ///
    /// Derivation: with `a·x <= b` and `x = M^{-1}(y - t)` we get
    /// `(M^{-T} a)·y <= b + (M^{-T} a)·t`. The incidence is combinatorial and
    /// carries over unchanged. Volumes scale by `|det M|`.
    pub fn push_forward(&self, m: &DMatrix<f64>, t: &DVector<f64>) -> Option<Self> {
        if m.nrows() != self.dim || m.ncols() != self.dim || t.len() != self.dim {
            return None;
        }
        let minv_t = m.clone().try_inverse()?.transpose();
        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex {
                id: v.id,
                coords: m * &v.coords + t,
            })
            .collect();
        let hyperplanes = self
            .hyperplanes
            .iter()
            .map(|h| {
                let a = &minv_t * &h.a;
                let b = h.b + a.dot(t);
                Hyperplane { a, b }
            })
            .collect();
        Some(Self {
            dim: self.dim,
            vertices,
            hyperplanes,
            incidence: self.incidence.clone(),
        })
    }
}

fn validate(
    coords: Vec<DVector<f64>>,
    hyperplanes: &[Hyperplane],
) -> Result<(usize, Vec<Vertex>), PolytopeError> {
    let dim = coords
        .first()
        .map(|c| c.len())
        .or_else(|| hyperplanes.first().map(|h| h.dim()))
        .unwrap_or(0);
    if dim == 0 {
        return Err(PolytopeError::ZeroDimension);
    }
    for (i, c) in coords.iter().enumerate() {
        if c.len() != dim {
            return Err(PolytopeError::CoordinateLength {
                vertex: i,
                expected: dim,
                found: c.len(),
            });
        }
        if !c.iter().all(|x| x.is_finite()) {
            return Err(PolytopeError::NonFinite {
                what: "vertex",
                index: i,
            });
        }
    }
    for (j, h) in hyperplanes.iter().enumerate() {
        if h.dim() != dim {
            return Err(PolytopeError::NormalLength {
                hyperplane: j,
                expected: dim,
                found: h.dim(),
            });
        }
        if !(h.b.is_finite() && h.a.iter().all(|x| x.is_finite())) {
            return Err(PolytopeError::NonFinite {
                what: "hyperplane",
                index: j,
            });
        }
    }
    if coords.len() < dim + 1 {
        return Err(PolytopeError::TooFewVertices {
            dim,
            found: coords.len(),
        });
    }
    if hyperplanes.len() < dim + 1 {
        return Err(PolytopeError::TooFewHyperplanes {
            dim,
            found: hyperplanes.len(),
        });
    }
    let vertices = coords
        .into_iter()
        .enumerate()
        .map(|(i, coords)| Vertex {
            id: VertexId(i),
            coords,
        })
        .collect();
    Ok((dim, vertices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn unit_square() -> Polytope {
        let vertices = vec![
            dvector![0.0, 0.0],
            dvector![1.0, 0.0],
            dvector![1.0, 1.0],
            dvector![0.0, 1.0],
        ];
        let hyperplanes = vec![
            Hyperplane::new(dvector![-1.0, 0.0], 0.0),
            Hyperplane::new(dvector![0.0, -1.0], 0.0),
            Hyperplane::new(dvector![1.0, 0.0], 1.0),
            Hyperplane::new(dvector![0.0, 1.0], 1.0),
        ];
        Polytope::new(vertices, hyperplanes).unwrap()
    }

    #[test]
    fn ine_row_flips_signs() {
        // 1 - x >= 0  <=>  x <= 1
        let h = Hyperplane::from_ine_row(&[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(h.a, dvector![-1.0, -0.0]);
        assert_eq!(h.b, 1.0);
        assert!(Hyperplane::from_ine_row(&[1.0]).is_none());
    }

    #[test]
    fn square_incidence_has_two_planes_per_vertex() {
        let sq = unit_square();
        for v in sq.vertices() {
            assert_eq!(sq.incidence().degree(v.id), 2);
        }
        assert!(sq.incidence().contains(VertexId(0), 0));
        assert!(sq.incidence().contains(VertexId(0), 1));
        assert!(!sq.incidence().contains(VertexId(0), 2));
    }

    #[test]
    fn validation_rejects_bad_input() {
        let err = Polytope::new(
            vec![dvector![0.0, 0.0], dvector![1.0]],
            vec![Hyperplane::new(dvector![1.0, 0.0], 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, PolytopeError::CoordinateLength { vertex: 1, .. }));

        let err = Polytope::new(
            vec![dvector![0.0, 0.0], dvector![1.0, 0.0]],
            vec![Hyperplane::new(dvector![1.0, 0.0], 1.0)],
        )
        .unwrap_err();
        assert_eq!(err, PolytopeError::TooFewVertices { dim: 2, found: 2 });

        assert_eq!(
            Polytope::new(Vec::new(), Vec::new()).unwrap_err(),
            PolytopeError::ZeroDimension
        );
    }

    #[test]
    fn renumbering_moves_degenerate_vertices_first() {
        // Square pyramid apex lies on four facets, base corners on three.
        let vertices = vec![
            dvector![0.0, 0.0, 0.0],
            dvector![1.0, 0.0, 0.0],
            dvector![1.0, 1.0, 0.0],
            dvector![0.0, 1.0, 0.0],
            dvector![0.5, 0.5, 1.0],
        ];
        let hyperplanes = vec![
            Hyperplane::new(dvector![0.0, 0.0, -1.0], 0.0),
            Hyperplane::new(dvector![0.0, -2.0, 1.0], 0.0),
            Hyperplane::new(dvector![2.0, 0.0, 1.0], 2.0),
            Hyperplane::new(dvector![0.0, 2.0, 1.0], 2.0),
            Hyperplane::new(dvector![-2.0, 0.0, 1.0], 0.0),
        ];
        let mut p = Polytope::new(vertices, hyperplanes).unwrap();
        assert_eq!(p.incidence().degree(VertexId(4)), 4);
        p.renumber_by_degeneracy();
        assert_eq!(p.vertex(VertexId(0)).coords, dvector![0.5, 0.5, 1.0]);
        for (i, v) in p.vertices().iter().enumerate() {
            assert_eq!(v.id, VertexId(i));
            for (j, h) in p.hyperplanes().iter().enumerate() {
                assert_eq!(
                    p.incidence().contains(v.id, j),
                    h.is_incident(&v.coords, INCIDENCE_EPS)
                );
            }
        }
        // Stable among equals: the old vertex 0 is now vertex 1.
        assert_eq!(p.vertex(VertexId(1)).coords, dvector![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalisation_reports_axis_scales() {
        let vertices = vec![
            dvector![0.0, 0.0],
            dvector![4.0, 0.0],
            dvector![4.0, -3.0],
            dvector![0.0, -3.0],
        ];
        let hyperplanes = vec![
            Hyperplane::new(dvector![-1.0, 0.0], 0.0),
            Hyperplane::new(dvector![0.0, -1.0], 3.0),
            Hyperplane::new(dvector![1.0, 0.0], 4.0),
            Hyperplane::new(dvector![0.0, 1.0], 0.0),
        ];
        let mut p = Polytope::new(vertices, hyperplanes).unwrap();
        let factor = p.normalise_coordinates();
        assert!((factor - 12.0).abs() < 1e-12);
        for v in p.vertices() {
            assert!(v.coords.amax() <= 1.0 + 1e-12);
            for (j, h) in p.hyperplanes().iter().enumerate() {
                assert_eq!(
                    p.incidence().contains(v.id, j),
                    h.is_incident(&v.coords, INCIDENCE_EPS)
                );
            }
        }
    }
}
