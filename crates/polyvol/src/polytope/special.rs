//! Special polytopes used in tests, benchmarks and examples.
//!
//! Purpose
//! - Provide canonical V+H representations for common families so tests can
//!   compare against closed-form volumes deterministically.
//!
//! References
//! - Volume formulas:
//!   - Hypercube [-a,a]^d: vol = (2a)^d.
//!   - Standard simplex conv{0, e_1, ..., e_d}: vol = 1/d!.
//!   - Cross polytope {‖x‖₁ ≤ r}: vol = (2r)^d / d!.
//!   - Unit cube with corner cut by `Σx ≤ d - t`: vol = 1 - t^d / d!.
//!   - Simplex conv{v_0..v_d}: vol = |det[v_1-v_0 .. v_d-v_0]| / d!.

use nalgebra::{DMatrix, DVector};

use super::types::{Hyperplane, Polytope, PolytopeError};

fn unit(dim: usize, axis: usize, scale: f64) -> DVector<f64> {
    let mut e = DVector::zeros(dim);
    e[axis] = scale;
    e
}

/// Axis-aligned hypercube [-a,a]^d.
pub fn hypercube(dim: usize, a: f64) -> Result<Polytope, PolytopeError> {
    let lo = vec![-a; dim];
    let hi = vec![a; dim];
    axis_box(&lo, &hi)
}

/// Axis-aligned box `lo <= x <= hi`.
pub fn axis_box(lo: &[f64], hi: &[f64]) -> Result<Polytope, PolytopeError> {
    let dim = lo.len().min(hi.len());
    let mut vertices = Vec::with_capacity(1 << dim);
    for mask in 0..(1usize << dim) {
        let v = DVector::from_fn(dim, |i, _| if (mask >> i) & 1 == 1 { hi[i] } else { lo[i] });
        vertices.push(v);
    }
    let mut hyperplanes = Vec::with_capacity(2 * dim);
    for axis in 0..dim {
        hyperplanes.push(Hyperplane::new(unit(dim, axis, -1.0), -lo[axis]));
        hyperplanes.push(Hyperplane::new(unit(dim, axis, 1.0), hi[axis]));
    }
    Polytope::new(vertices, hyperplanes)
}

/// conv{0, e_1, ..., e_d}.
pub fn standard_simplex(dim: usize) -> Result<Polytope, PolytopeError> {
    let mut vertices = Vec::with_capacity(dim + 1);
    vertices.push(DVector::zeros(dim));
    for axis in 0..dim {
        vertices.push(unit(dim, axis, 1.0));
    }
    let mut hyperplanes: Vec<Hyperplane> = (0..dim)
        .map(|axis| Hyperplane::new(unit(dim, axis, -1.0), 0.0))
        .collect();
    hyperplanes.push(Hyperplane::new(DVector::from_element(dim, 1.0), 1.0));
    Polytope::new(vertices, hyperplanes)
}

/// Simplex spanned by `d+1` affinely independent points.
///
/// The facet opposite `v_i` is `λ_i(x) >= 0` in barycentric coordinates
/// `λ(x) = M^{-1}(x - v_0)`, `λ_0 = 1 - Σλ_i`, with `M = [v_1-v_0 .. v_d-v_0]`.
/// Returns `None` for degenerate or mis-sized input.
pub fn simplex_from_vertices(points: Vec<DVector<f64>>) -> Option<Polytope> {
    let dim = points.first()?.len();
    if dim == 0 || points.len() != dim + 1 || points.iter().any(|p| p.len() != dim) {
        return None;
    }
    let v0 = points[0].clone();
    let m = DMatrix::from_fn(dim, dim, |r, c| points[c + 1][r] - v0[r]);
    let minv = m.try_inverse()?;
    let mut hyperplanes = Vec::with_capacity(dim + 1);
    let mut sum = DVector::zeros(dim);
    for i in 0..dim {
        let row: DVector<f64> = minv.row(i).transpose();
        sum += &row;
        hyperplanes.push(Hyperplane::new(-&row, -row.dot(&v0)));
    }
    let b0 = 1.0 + sum.dot(&v0);
    hyperplanes.insert(0, Hyperplane::new(sum, b0));
    Polytope::new(points, hyperplanes).ok()
}

/// Cross polytope (ℓ1 ball) `{x : Σ|x_i| <= r}`.
///
/// Not simple for d >= 3: every vertex lies on 2^(d-1) facets.
pub fn cross_polytope(dim: usize, r: f64) -> Result<Polytope, PolytopeError> {
    let mut vertices = Vec::with_capacity(2 * dim);
    for axis in 0..dim {
        vertices.push(unit(dim, axis, r));
        vertices.push(unit(dim, axis, -r));
    }
    let mut hyperplanes = Vec::with_capacity(1 << dim);
    for mask in 0..(1usize << dim) {
        let n = DVector::from_fn(dim, |i, _| if (mask >> i) & 1 == 1 { 1.0 } else { -1.0 });
        hyperplanes.push(Hyperplane::new(n, r));
    }
    Polytope::new(vertices, hyperplanes)
}

/// Unit cube [0,1]^d with the corner at (1,..,1) cut off by `Σx <= d - t`.
///
/// Simple for `0 < t < 1`.
pub fn cube_with_cut_corner(dim: usize, t: f64) -> Result<Polytope, PolytopeError> {
    let ones = DVector::from_element(dim, 1.0);
    let mut vertices = Vec::with_capacity((1 << dim) - 1 + dim);
    for mask in 0..(1usize << dim) - 1 {
        vertices.push(DVector::from_fn(dim, |i, _| ((mask >> i) & 1) as f64));
    }
    for axis in 0..dim {
        vertices.push(&ones - unit(dim, axis, t));
    }
    let mut hyperplanes = Vec::with_capacity(2 * dim + 1);
    for axis in 0..dim {
        hyperplanes.push(Hyperplane::new(unit(dim, axis, -1.0), 0.0));
        hyperplanes.push(Hyperplane::new(unit(dim, axis, 1.0), 1.0));
    }
    hyperplanes.push(Hyperplane::new(ones, dim as f64 - t));
    Polytope::new(vertices, hyperplanes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polytope::VertexId;
    use nalgebra::dvector;

    #[test]
    fn hypercube_counts() {
        let c = hypercube(3, 1.0).unwrap();
        assert_eq!(c.num_vertices(), 8);
        assert_eq!(c.num_hyperplanes(), 6);
        for v in c.vertices() {
            assert_eq!(c.incidence().degree(v.id), 3);
        }
    }

    #[test]
    fn simplex_facets_contain_the_other_vertices() {
        let s = simplex_from_vertices(vec![
            dvector![0.5, -1.0, 0.0],
            dvector![2.0, 0.0, 0.3],
            dvector![0.0, 1.5, 0.0],
            dvector![0.1, 0.2, 2.0],
        ])
        .unwrap();
        for v in s.vertices() {
            assert_eq!(s.incidence().degree(v.id), 3);
            for h in s.hyperplanes() {
                assert!(h.satisfies(&v.coords, 1e-9));
            }
        }
        // Facet 0 is opposite vertex 0.
        assert!(!s.incidence().contains(VertexId(0), 0));
    }

    #[test]
    fn degenerate_simplex_is_rejected() {
        assert!(simplex_from_vertices(vec![
            dvector![0.0, 0.0],
            dvector![1.0, 1.0],
            dvector![2.0, 2.0],
        ])
        .is_none());
    }

    #[test]
    fn cross_polytope_is_not_simple() {
        let cp = cross_polytope(3, 1.0).unwrap();
        assert_eq!(cp.num_hyperplanes(), 8);
        for v in cp.vertices() {
            assert_eq!(cp.incidence().degree(v.id), 4);
        }
    }

    #[test]
    fn cut_cube_is_simple() {
        let p = cube_with_cut_corner(3, 0.5).unwrap();
        assert_eq!(p.num_vertices(), 10);
        for v in p.vertices() {
            assert_eq!(p.incidence().degree(v.id), 3);
        }
    }
}
