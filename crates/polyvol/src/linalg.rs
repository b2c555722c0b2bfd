//! Gaussian elimination on augmented matrices.
//!
//! Purpose
//! - Determinants of the simplices produced by the plain triangulation.
//! - Vertex systems `N γ = c` in Lawrence's formula.
//!
//! Conventions
//! - The determinant is the product of the pivots; row/column exchanges do not
//!   flip its sign. Every caller wants a volume and takes the absolute value.
//! - A pivot below `eps` means "singular": the result is 0, never an error.

use nalgebra::DVector;
use tracing::warn;

use crate::cfg::Pivoting;
use crate::face::VertexSet;
use crate::polytope::Vertex;

/// Row-major `rows × cols` matrix, `cols >= rows`.
///
/// The leading `rows × rows` block is the system; columns `rows..cols` are
/// right-hand sides that elimination overwrites with the solution. Rows are
/// separate vectors so that a row exchange moves two handles.
#[derive(Clone, Debug, PartialEq)]
pub struct AugmentedMatrix {
    rows: Vec<DVector<f64>>,
    cols: usize,
}

impl AugmentedMatrix {
    /// Returns `None` when `cols < rows`.
    pub fn zeros(rows: usize, cols: usize) -> Option<Self> {
        if cols < rows {
            return None;
        }
        Some(Self {
            rows: (0..rows).map(|_| DVector::zeros(cols)).collect(),
            cols,
        })
    }

    /// Square `n × n` system followed by `rhs` right-hand side columns, all 0.
    pub fn system(n: usize, rhs: usize) -> Self {
        Self {
            rows: (0..n).map(|_| DVector::zeros(n + rhs)).collect(),
            cols: n + rhs,
        }
    }

    /// Returns `None` for ragged rows or fewer columns than rows.
    pub fn from_rows(rows: Vec<DVector<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if cols < rows.len() || rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self { rows, cols })
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.rows[r][c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.rows[r][c] = value;
    }

    /// Component `i` of the solution for right-hand side `k` (column `rows + k`),
    /// valid after a non-singular `reduce_and_invert`.
    #[inline]
    pub fn solution(&self, i: usize, k: usize) -> f64 {
        self.rows[i][self.rows.len() + k]
    }

    fn pick_pivot(&self, k: usize, pivoting: Pivoting) -> (usize, usize) {
        let n = self.rows.len();
        let abs = |r: usize, c: usize| self.rows[r][c].abs();
        match pivoting {
            Pivoting::Threshold { min_pivot } => {
                let mut best = k;
                for r in k..n {
                    if abs(r, k) > min_pivot {
                        return (r, k);
                    }
                    if abs(r, k) > abs(best, k) {
                        best = r;
                    }
                }
                (best, k)
            }
            Pivoting::Total if self.cols == n => {
                let mut best = (k, k);
                for r in k..n {
                    for c in k..n {
                        if abs(r, c) > abs(best.0, best.1) {
                            best = (r, c);
                        }
                    }
                }
                best
            }
            Pivoting::Partial | Pivoting::Total => {
                let mut best = k;
                for r in k + 1..n {
                    if abs(r, k) > abs(best, k) {
                        best = r;
                    }
                }
                (best, k)
            }
        }
    }
}

/// Triangularise the leading block of `m`, back-substitute the trailing
/// columns and return the determinant (product of pivots).
///
/// Returns 0 as soon as a pivot falls below `eps`; `m` is left partially
/// reduced in that case. With `verbose`, the singular pivot is logged.
pub fn reduce_and_invert(
    m: &mut AugmentedMatrix,
    pivoting: Pivoting,
    eps: f64,
    verbose: bool,
) -> f64 {
    let n = m.nrows();
    let cols = m.ncols();
    let mut det = 1.0;

    for k in 0..n {
        let (pr, pc) = m.pick_pivot(k, pivoting);
        if pr != k {
            m.rows.swap(k, pr);
        }
        if pc != k {
            for row in m.rows.iter_mut() {
                row.swap_rows(k, pc);
            }
        }
        let pivot = m.rows[k][k];
        if pivot.abs() < eps {
            if verbose {
                warn!(step = k, pivot, rows = n, cols, "singular matrix, determinant set to 0");
            }
            return 0.0;
        }
        det *= pivot;

        let (top, below) = m.rows.split_at_mut(k + 1);
        let prow = &top[k];
        for row in below.iter_mut() {
            let f = row[k] / pivot;
            if f != 0.0 {
                for c in k..cols {
                    row[c] -= f * prow[c];
                }
            }
        }
    }

    for c in n..cols {
        for i in (0..n).rev() {
            let tail: f64 = (i + 1..n).map(|j| m.rows[i][j] * m.rows[j][c]).sum();
            let x = (m.rows[i][c] - tail) / m.rows[i][i];
            m.rows[i][c] = x;
        }
    }
    det
}

/// `n!` as a float.
pub fn factorial(n: usize) -> f64 {
    (2..=n).map(|i| i as f64).product()
}

/// `d!` times the volume of the simplex spanned by the `d+1` vertices in
/// `simplex`. Returns 0 for a wrong vertex count or a degenerate simplex.
pub fn simplex_volume(
    vertices: &[Vertex],
    simplex: &VertexSet,
    pivoting: Pivoting,
    eps: f64,
    verbose: bool,
) -> f64 {
    let Some(last) = simplex.as_slice().last() else {
        return 0.0;
    };
    let base = &vertices[last.index()].coords;
    let d = base.len();
    if simplex.len() != d + 1 {
        return 0.0;
    }
    let rows = simplex
        .iter()
        .take(d)
        .map(|id| &vertices[id.index()].coords - base)
        .collect();
    let mut m = AugmentedMatrix { rows, cols: d };
    reduce_and_invert(&mut m, pivoting, eps, verbose).abs()
}
