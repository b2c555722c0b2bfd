//! Householder bases of face affine hulls.
//!
//! Purpose
//! - The cached triangulation measures a face as Σ (child volume × apex height).
//!   Heights need an orthonormal frame of each child's affine hull, and that
//!   frame is carried up the recursion instead of being recomputed.
//!
//! Representation
//! - A basis of a k-flat is a list of k reflectors `u_0..u_{k-1}`, unit
//!   vectors with `u_i[..i] = 0`. Applying `H_i = I - 2 u_i u_iᵀ` for
//!   `i = 0, 1, ..` maps the flat's directions onto the first k axes; the
//!   remaining coordinates are the orthogonal residual.

use nalgebra::DVector;

use crate::face::VertexSet;
use crate::polytope::{Vertex, VertexId};

/// Householder reflectors spanning the direction space of a face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrthoBasis {
    reflectors: Vec<DVector<f64>>,
}

impl OrthoBasis {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the spanned flat.
    #[inline]
    pub fn dim(&self) -> usize {
        self.reflectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reflectors.is_empty()
    }

    #[inline]
    pub fn reflectors(&self) -> &[DVector<f64>] {
        &self.reflectors
    }

    /// Apply all reflectors in order.
    pub fn apply(&self, x: &mut DVector<f64>) {
        for (i, u) in self.reflectors.iter().enumerate() {
            reflect(u, x, i);
        }
    }
}

/// `x -= 2 (u·x) u`, where `u` vanishes before index `from`.
fn reflect(u: &DVector<f64>, x: &mut DVector<f64>, from: usize) {
    let n = x.len();
    let dot: f64 = (from..n).map(|i| u[i] * x[i]).sum();
    let s = 2.0 * dot;
    for i in from..n {
        x[i] -= s * u[i];
    }
}

/// Turn `v` into the reflector at index `k` that maps `v[k..]` onto the k-th
/// axis. `alpha_sq` is `|v[k..]|²`; returns `|v[k..]|`.
fn make_reflector(v: &mut DVector<f64>, k: usize, alpha_sq: f64) -> f64 {
    let norm = alpha_sq.sqrt();
    let alpha = if v[k] < 0.0 { -norm } else { norm };
    let divisor = (2.0 * (alpha_sq + alpha * v[k])).sqrt();
    v[k] += alpha;
    for (i, x) in v.iter_mut().enumerate() {
        *x = if i < k { 0.0 } else { *x / divisor };
    }
    norm
}

/// Orthonormal basis of the `level`-dimensional hull of `face`, and
/// `level!` times its volume when `face` has exactly `level + 1` vertices.
///
/// Spanning vectors are `face[i] - face[0]`; at every step the one with the
/// largest residual is used. If the largest residual squared, relative to the
/// product of the pivots so far, drops below `eps`, the face is rank-deficient
/// and the scaled volume is 0.
pub fn orthonormal_basis(
    level: usize,
    face: &VertexSet,
    vertices: &[Vertex],
    eps: f64,
) -> (OrthoBasis, f64) {
    let ids = face.as_slice();
    if level == 0 {
        return (OrthoBasis::new(), 1.0);
    }
    if ids.len() < level + 1 {
        return (OrthoBasis::new(), 0.0);
    }
    let origin = &vertices[ids[0].index()].coords;
    let mut cand: Vec<DVector<f64>> = ids[1..]
        .iter()
        .map(|id| &vertices[id.index()].coords - origin)
        .collect();
    let mut norms: Vec<f64> = cand.iter().map(|v| v.norm_squared()).collect();
    let mut volume = 1.0;

    for k in 0..level {
        let mut best = k;
        for j in k + 1..cand.len() {
            if norms[j] > norms[best] {
                best = j;
            }
        }
        let alpha_sq = norms[best];
        if alpha_sq / volume < eps {
            return (OrthoBasis::new(), 0.0);
        }
        cand.swap(k, best);
        norms.swap(k, best);

        let (head, rest) = cand.split_at_mut(k + 1);
        let u = &mut head[k];
        volume *= make_reflector(u, k, alpha_sq);
        for (w, n) in rest.iter_mut().zip(norms[k + 1..].iter_mut()) {
            reflect(u, w, k);
            *n -= w[k] * w[k];
        }
    }

    cand.truncate(level);
    (OrthoBasis { reflectors: cand }, volume)
}

/// Extend the `d-1` reflectors of `basis` (spanning `face`) by the direction
/// towards `apex`; returns the distance from `apex` to the hull of `face`.
///
/// The difference vector starts at the face member nearest to `apex`, which
/// keeps cancellation small. A residual below `eps`, or a basis of the wrong
/// size, returns 0 and leaves `basis` unchanged.
pub fn extend_basis(
    d: usize,
    face: &VertexSet,
    basis: &mut OrthoBasis,
    apex: VertexId,
    vertices: &[Vertex],
    eps: f64,
) -> f64 {
    if d == 0 || basis.dim() + 1 != d {
        return 0.0;
    }
    let target = &vertices[apex.index()].coords;
    let nearest = face
        .iter()
        .map(|id| &vertices[id.index()].coords)
        .min_by(|a, b| {
            let da = (*a - target).norm_squared();
            let db = (*b - target).norm_squared();
            da.total_cmp(&db)
        });
    let Some(nearest) = nearest else {
        return 0.0;
    };
    let mut diff = target - nearest;
    basis.apply(&mut diff);

    let k = d - 1;
    let alpha_sq: f64 = (k..diff.len()).map(|i| diff[i] * diff[i]).sum();
    if alpha_sq.sqrt() < eps {
        return 0.0;
    }
    let dist = make_reflector(&mut diff, k, alpha_sq);
    basis.reflectors.push(diff);
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn verts(points: Vec<DVector<f64>>) -> Vec<Vertex> {
        points
            .into_iter()
            .enumerate()
            .map(|(i, coords)| Vertex {
                id: VertexId(i),
                coords,
            })
            .collect()
    }

    fn set(ids: &[usize]) -> VertexSet {
        ids.iter().copied().map(VertexId).collect()
    }

    #[test]
    fn triangle_area_and_orthonormality() {
        let vs = verts(vec![
            dvector![1.0, 1.0, 0.0],
            dvector![3.0, 1.0, 0.0],
            dvector![1.0, 4.0, 0.0],
        ]);
        let (basis, vol) = orthonormal_basis(2, &set(&[0, 1, 2]), &vs, 1e-10);
        // 2! × area = 2 × 3 = 6
        assert!((vol - 6.0).abs() < 1e-12);
        assert_eq!(basis.dim(), 2);
        for (i, u) in basis.reflectors().iter().enumerate() {
            assert!((u.norm() - 1.0).abs() < 1e-12);
            assert!(u.rows(0, i).iter().all(|&x| x == 0.0));
        }
        // The normal direction of the triangle's plane keeps its residual.
        let mut z = dvector![0.0, 0.0, 1.0];
        basis.apply(&mut z);
        assert!(z[0].abs() < 1e-12 && z[1].abs() < 1e-12);
        assert!((z[2].abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_are_rank_deficient() {
        let vs = verts(vec![
            dvector![0.0, 0.0],
            dvector![1.0, 1.0],
            dvector![2.0, 2.0],
        ]);
        let (basis, vol) = orthonormal_basis(2, &set(&[0, 1, 2]), &vs, 1e-10);
        assert_eq!(vol, 0.0);
        assert!(basis.is_empty());
    }

    #[test]
    fn extension_measures_apex_height() {
        let vs = verts(vec![
            dvector![0.0, 0.0, 0.0],
            dvector![2.0, 0.0, 0.0],
            dvector![0.0, 2.0, 0.0],
            dvector![0.3, 0.4, 5.0],
        ]);
        let base = set(&[0, 1, 2]);
        let (mut basis, vol) = orthonormal_basis(2, &base, &vs, 1e-10);
        assert!((vol - 4.0).abs() < 1e-12);
        let h = extend_basis(3, &base, &mut basis, VertexId(3), &vs, 1e-10);
        assert!((h - 5.0).abs() < 1e-12);
        assert_eq!(basis.dim(), 3);
        // vol × h = 3! × tetrahedron volume = 20
        assert!((vol * h - 20.0).abs() < 1e-10);
    }

    #[test]
    fn apex_on_the_flat_leaves_basis_alone() {
        let vs = verts(vec![
            dvector![0.0, 0.0],
            dvector![1.0, 0.0],
            dvector![4.0, 0.0],
        ]);
        let edge = set(&[0, 1]);
        let (mut basis, vol) = orthonormal_basis(1, &edge, &vs, 1e-10);
        assert!((vol - 1.0).abs() < 1e-12);
        assert_eq!(extend_basis(2, &edge, &mut basis, VertexId(2), &vs, 1e-10), 0.0);
        assert_eq!(basis.dim(), 1);
    }
}
