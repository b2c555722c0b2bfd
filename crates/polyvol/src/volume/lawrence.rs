//! Lawrence's formula for simple polytopes.
//!
//! For a generic direction `c`, write `c = Σ γ_i a_i` over the normals of the
//! `d` facets through vertex `v`. Then
//!
//!   vol = 1/d! · Σ_v (c·v)^d / (|det N_v| · Π γ_i)
//!
//! where `N_v` has those normals as columns. Terms have mixed signs.
//!
//! References
//! - J. Lawrence, "Polytope volume computation", Math. Comp. 57 (1991).

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use super::context::Run;
use super::VolumeError;
use crate::linalg::{factorial, reduce_and_invert, AugmentedMatrix};

impl Run {
    /// Lawrence's sum along a direction drawn from `cfg.random_seed`.
    pub(crate) fn lawrence(&mut self) -> Result<f64, VolumeError> {
        let mut rng = StdRng::seed_from_u64(self.cfg.random_seed);
        let c = DVector::from_fn(self.top_dim, |_, _| rng.gen_range(-1.0..1.0));
        self.lawrence_along(&c)
    }

    /// Lawrence's sum along `c`, which must not be parallel to any face
    /// through a vertex.
    pub(crate) fn lawrence_along(&mut self, c: &DVector<f64>) -> Result<f64, VolumeError> {
        let d = self.top_dim;
        let mut sum = 0.0;

        for v in self.poly.vertices() {
            let planes: Vec<usize> = self.poly.incidence().planes_of(v.id).collect();
            if planes.len() != d {
                let err = if planes.len() > d {
                    VolumeError::NonSimplicialVertex {
                        vertex: v.id,
                        coords: v.coords.iter().copied().collect(),
                        planes,
                    }
                } else {
                    VolumeError::UnderdeterminedVertex {
                        vertex: v.id,
                        coords: v.coords.iter().copied().collect(),
                        planes,
                    }
                };
                error!(%err, "Lawrence's formula aborted");
                return Err(err);
            }

            let mut m = AugmentedMatrix::system(d, 1);
            for i in 0..d {
                for (col, &p) in planes.iter().enumerate() {
                    m.set(i, col, self.poly.hyperplanes()[p].a[i]);
                }
                m.set(i, d, c[i]);
            }
            let det = reduce_and_invert(&mut m, self.cfg.pivoting, self.cfg.eps, self.cfg.verbose);
            if det == 0.0 {
                let err = VolumeError::SingularVertexSystem {
                    vertex: v.id,
                    coords: v.coords.iter().copied().collect(),
                    planes,
                };
                error!(%err, "Lawrence's formula aborted");
                return Err(err);
            }

            let mut term = 1.0 / det.abs();
            for i in 0..d {
                let gamma = m.solution(i, 0);
                if gamma.abs() < self.cfg.eps {
                    let err = VolumeError::ZeroDenominator {
                        vertex: v.id,
                        coords: v.coords.iter().copied().collect(),
                        value: gamma,
                    };
                    error!(%err, "Lawrence's formula aborted");
                    return Err(err);
                }
                term /= gamma;
            }
            term *= c.dot(&v.coords).powi(d as i32);

            if self.stats.record_partial(term) {
                info!(partial_volumes = self.stats.partial_volumes, "progress");
            }
            sum += term;
        }
        Ok(sum / factorial(d))
    }
}
