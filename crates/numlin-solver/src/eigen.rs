//! Jacobi eigenvalue method for symmetric matrices.
//!
//! The working matrix `D` starts as `A` and the accumulated rotation `R` as
//! the identity. Each iteration picks the largest off-diagonal element
//! `D[p][q]` and applies the plane rotation that zeroes it:
//!
//! ```text
//! D ← Jᵀ D J        R ← Jᵀ R
//! ```
//!
//! so that at every step `D = R A Rᵀ`. On termination the eigenvalues are the
//! diagonal of `D` and row `i` of `R` is the eigenvector for eigenvalue `i`.
//! The order follows the diagonal; nothing is sorted unless the caller asks
//! for [`EigenDecomposition::sorted_descending`].

use std::f64::consts::FRAC_PI_4;

use nalgebra::{DMatrix, DVector};

use crate::config::EigenConfig;
use crate::error::Result;
use crate::matrix::{check_square, check_symmetric, describe_matrix, identity};
use crate::solution::Status;
use crate::trace::Trace;

/// A rotation in the `(p, q)` plane.
///
/// As a matrix it is the identity except `(p,p) = (q,q) = cos`,
/// `(p,q) = sin` and `(q,p) = -sin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRotation {
    pub p: usize,
    pub q: usize,
    pub cos: f64,
    pub sin: f64,
}

impl PlaneRotation {
    /// The rotation that zeroes `d[p][q]` of a symmetric matrix.
    ///
    /// Uses `theta = π/4` when `d[p][p] == d[q][q]`, otherwise
    /// `theta = atan(2·d[p][q] / (d[q][q] - d[p][p])) / 2`.
    pub fn annihilating(d: &DMatrix<f64>, p: usize, q: usize) -> Self {
        let (dpp, dqq) = (d[(p, p)], d[(q, q)]);
        let theta = if dqq == dpp {
            FRAC_PI_4
        } else {
            0.5 * (2.0 * d[(p, q)] / (dqq - dpp)).atan()
        };
        Self {
            p,
            q,
            cos: theta.cos(),
            sin: theta.sin(),
        }
    }

    /// Dense `n × n` form.
    pub fn to_matrix(&self, n: usize) -> DMatrix<f64> {
        let mut m = identity(n);
        m[(self.p, self.p)] = self.cos;
        m[(self.q, self.q)] = self.cos;
        m[(self.p, self.q)] = self.sin;
        m[(self.q, self.p)] = -self.sin;
        m
    }

    /// `r ← Jᵀ r`. Only rows `p` and `q` change.
    pub fn accumulate(&self, r: &mut DMatrix<f64>) {
        let (c, s) = (self.cos, self.sin);
        for k in 0..r.ncols() {
            let rp = r[(self.p, k)];
            let rq = r[(self.q, k)];
            r[(self.p, k)] = c * rp - s * rq;
            r[(self.q, k)] = s * rp + c * rq;
        }
    }

    /// `d ← Jᵀ d J` for symmetric `d`. Only rows and columns `p` and `q`
    /// change, and `d[p][q]` becomes exactly zero.
    pub fn apply_similarity(&self, d: &mut DMatrix<f64>) {
        let (p, q) = (self.p, self.q);
        let (c, s) = (self.cos, self.sin);
        let (dpp, dqq, dpq) = (d[(p, p)], d[(q, q)], d[(p, q)]);

        for j in (0..d.nrows()).filter(|&j| j != p && j != q) {
            let djp = d[(j, p)];
            let djq = d[(j, q)];
            let new_jp = c * djp - s * djq;
            let new_jq = c * djq + s * djp;
            d[(j, p)] = new_jp;
            d[(p, j)] = new_jp;
            d[(j, q)] = new_jq;
            d[(q, j)] = new_jq;
        }

        d[(p, p)] = c * c * dpp + s * s * dqq - 2.0 * c * s * dpq;
        d[(q, q)] = s * s * dpp + c * c * dqq + 2.0 * c * s * dpq;
        d[(p, q)] = 0.0;
        d[(q, p)] = 0.0;
    }
}

/// Eigenvalues and eigenvectors of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Diagonal of the final working matrix.
    pub eigenvalues: DVector<f64>,
    /// Column `i` is the unit eigenvector paired with `eigenvalues[i]`.
    pub eigenvectors: DMatrix<f64>,
    /// Rotations applied.
    pub iterations: usize,
    /// Largest remaining off-diagonal magnitude.
    pub off_diagonal: f64,
    /// Whether `off_diagonal` fell below the threshold.
    pub converged: bool,
    /// `EigenpairsObtained`, or `MaxIterationsReached` if the cap was hit first.
    pub status: Status,
    /// Intermediate state, if tracing was enabled.
    pub trace: Trace,
}

impl EigenDecomposition {
    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Eigenvector `i` as an owned vector.
    pub fn eigenvector(&self, i: usize) -> DVector<f64> {
        self.eigenvectors.column(i).into_owned()
    }

    /// `(eigenvalue, eigenvector)` pairs in diagonal order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, DVector<f64>)> + '_ {
        (0..self.dim()).map(move |i| (self.eigenvalues[i], self.eigenvector(i)))
    }

    /// A copy with pairs reordered by descending eigenvalue.
    pub fn sorted_descending(&self) -> Self {
        let mut order: Vec<usize> = (0..self.dim()).collect();
        order.sort_by(|&i, &j| self.eigenvalues[j].total_cmp(&self.eigenvalues[i]));

        let n = self.dim();
        let eigenvalues = DVector::from_fn(n, |k, _| self.eigenvalues[order[k]]);
        let eigenvectors = DMatrix::from_fn(n, n, |row, k| self.eigenvectors[(row, order[k])]);

        Self {
            eigenvalues,
            eigenvectors,
            ..self.clone()
        }
    }
}

/// Eigen-decompose a symmetric matrix by Jacobi rotations.
///
/// Stops when the largest off-diagonal magnitude is below `config.tol` or
/// after `config.max_iter` rotations. The only failures are input checks
/// (`DimensionMismatch`, `EmptyMatrix`, `NotSymmetric`).
pub fn jacobi_eigen(a: &DMatrix<f64>, config: &EigenConfig) -> Result<EigenDecomposition> {
    let n = check_square(a)?;
    check_symmetric(a, config.symmetry_tol)?;

    let mut trace = Trace::new(config.trace);
    trace.record("input", || format!("A:\n{}", describe_matrix(a)));

    let mut d = a.clone();
    let mut r = identity(n);
    let mut iterations = 0;

    let off_diagonal = loop {
        let (p, q, largest) = largest_off_diagonal(&d);
        if largest < config.tol || iterations >= config.max_iter {
            break largest;
        }
        iterations += 1;

        let rotation = PlaneRotation::annihilating(&d, p, q);
        rotation.accumulate(&mut r);
        rotation.apply_similarity(&mut d);

        trace.record(format!("rotation {} on ({}, {})", iterations, p, q), || {
            format!("R:\n{}\nD:\n{}", describe_matrix(&r), describe_matrix(&d))
        });
    };

    let converged = off_diagonal < config.tol;
    let status = if converged {
        log::debug!("jacobi eigen converged after {} rotations", iterations);
        Status::EigenpairsObtained
    } else {
        log::warn!(
            "jacobi eigen stopped after {} rotations with off-diagonal {:e}",
            iterations,
            off_diagonal
        );
        Status::MaxIterationsReached
    };

    Ok(EigenDecomposition {
        eigenvalues: d.diagonal(),
        eigenvectors: r.transpose(),
        iterations,
        off_diagonal,
        converged,
        status,
        trace,
    })
}

/// Position and magnitude of the largest strictly-upper element.
/// The first maximum in row-major order wins ties.
fn largest_off_diagonal(d: &DMatrix<f64>) -> (usize, usize, f64) {
    let n = d.nrows();
    if n < 2 {
        return (0, 0, 0.0);
    }

    let mut best = (0, 1, d[(0, 1)].abs());
    for i in 0..(n - 1) {
        for j in (i + 1)..n {
            let magnitude = d[(i, j)].abs();
            if magnitude > best.2 {
                best = (i, j, magnitude);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use nalgebra::dmatrix;

    fn sample() -> DMatrix<f64> {
        dmatrix![
            4.0, 2.0, 2.0, 1.0;
            2.0, -3.0, 1.0, 1.0;
            2.0, 1.0, 3.0, 1.0;
            1.0, 1.0, 1.0, 2.0
        ]
    }

    #[test]
    fn two_by_two_single_rotation() {
        let s3 = 3.0_f64.sqrt();
        let a = dmatrix![2.0, s3; s3, 4.0];

        let eig = jacobi_eigen(&a, &EigenConfig::default()).unwrap();
        assert!(eig.converged);
        assert_eq!(eig.iterations, 1);
        assert_eq!(eig.status, Status::EigenpairsObtained);
        // Diagonal order, not sorted.
        assert!((eig.eigenvalues[0] - 1.0).abs() < 1e-12);
        assert!((eig.eigenvalues[1] - 5.0).abs() < 1e-12);

        let sorted = eig.sorted_descending();
        assert!((sorted.eigenvalues[0] - 5.0).abs() < 1e-12);
        assert_eq!(sorted.eigenvector(0), eig.eigenvector(1));
    }

    #[test]
    fn sample_trace_and_eigenpairs() {
        let a = sample();
        let eig = jacobi_eigen(&a, &EigenConfig::default()).unwrap();

        assert!(eig.converged);
        assert!((eig.eigenvalues.sum() - 6.0).abs() < 1e-9);

        for (lambda, v) in eig.pairs() {
            let residual = &a * &v - &v * lambda;
            assert!(residual.amax() < 1e-8, "residual {}", residual.amax());
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn eigenvectors_are_orthonormal() {
        let eig = jacobi_eigen(&sample(), &EigenConfig::default()).unwrap();
        let gram = eig.eigenvectors.transpose() * &eig.eigenvectors;
        assert!((gram - identity(4)).amax() < 1e-12);
    }

    #[test]
    fn in_place_updates_match_dense_rotation() {
        let a = sample();
        let rotation = PlaneRotation::annihilating(&a, 0, 1);
        let j = rotation.to_matrix(4);

        let mut d = a.clone();
        rotation.apply_similarity(&mut d);
        let dense = j.transpose() * &a * &j;
        assert!((&d - &dense).amax() < 1e-12);
        assert_eq!(d[(0, 1)], 0.0);

        let mut r = identity(4);
        rotation.accumulate(&mut r);
        assert!((&r - j.transpose()).amax() < 1e-15);
    }

    #[test]
    fn equal_diagonal_uses_quarter_turn() {
        let a = dmatrix![1.0, 2.0; 2.0, 1.0];
        let rotation = PlaneRotation::annihilating(&a, 0, 1);
        assert!((rotation.cos - FRAC_PI_4.cos()).abs() < 1e-15);
        assert!((rotation.sin - FRAC_PI_4.sin()).abs() < 1e-15);

        let eig = jacobi_eigen(&a, &EigenConfig::default()).unwrap();
        let mut values: Vec<f64> = eig.eigenvalues.iter().copied().collect();
        values.sort_by(f64::total_cmp);
        assert!((values[0] + 1.0).abs() < 1e-12);
        assert!((values[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn diagonal_input_needs_no_rotation() {
        let a = dmatrix![3.0, 0.0; 0.0, -1.0];
        let eig = jacobi_eigen(&a, &EigenConfig::default()).unwrap();

        assert_eq!(eig.iterations, 0);
        assert_eq!(eig.eigenvalues[0], 3.0);
        assert_eq!(eig.eigenvectors, identity(2));
    }

    #[test]
    fn one_by_one() {
        let a = dmatrix![7.0];
        let eig = jacobi_eigen(&a, &EigenConfig::default()).unwrap();
        assert!(eig.converged);
        assert_eq!(eig.eigenvalues[0], 7.0);
    }

    #[test]
    fn iteration_cap_is_not_an_error() {
        let config = EigenConfig::default().with_max_iter(1);
        let eig = jacobi_eigen(&sample(), &config).unwrap();

        assert_eq!(eig.iterations, 1);
        assert!(!eig.converged);
        assert_eq!(eig.status, Status::MaxIterationsReached);
        assert!((eig.eigenvalues.sum() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_asymmetric() {
        let a = dmatrix![1.0, 2.0; 0.0, 1.0];
        assert!(matches!(
            jacobi_eigen(&a, &EigenConfig::default()),
            Err(Error::NotSymmetric { row: 0, col: 1 })
        ));
    }

    #[test]
    fn trace_has_one_step_per_rotation() {
        let config = EigenConfig::default().with_trace(true);
        let eig = jacobi_eigen(&sample(), &config).unwrap();
        assert_eq!(eig.trace.len(), eig.iterations + 1);
    }
}
