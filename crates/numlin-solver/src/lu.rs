//! LU and Cholesky decomposition with triangular substitution.
//!
//! The general path is a Doolittle factorization (unit diagonal on `L`)
//! without pivoting. The Cholesky path applies to symmetric positive-definite
//! matrices and returns `U = L^T`. Both solve via forward substitution
//! `L y = b` followed by back substitution `U x = y`.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::matrix::{
    check_len, check_square, check_symmetric, describe_matrix, describe_vector, product,
};
use crate::solution::{Solved, Status};
use crate::trace::Trace;

/// Relative tolerance used when checking symmetry before Cholesky.
const CHOLESKY_SYMMETRY_TOL: f64 = 1e-12;

/// Which recurrence produced a factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    /// Unit lower diagonal, general square matrix.
    Doolittle,
    /// `L L^T` for symmetric positive-definite matrices.
    Cholesky,
}

/// Lower and upper triangular factors with `L * U = A`.
#[derive(Debug, Clone)]
pub struct LuFactors {
    /// Lower-triangular factor.
    pub l: DMatrix<f64>,
    /// Upper-triangular factor.
    pub u: DMatrix<f64>,
    /// Recurrence that produced the factors.
    pub kind: FactorKind,
}

impl LuFactors {
    /// Dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Recompute `L * U`.
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.l * &self.u
    }

    /// Solve `L U x = b` for a new right-hand side.
    pub fn solve(&self, b: &DVector<f64>) -> Result<Solved<DVector<f64>>> {
        check_len(self.dim(), b.len())?;

        let (y, forward_ops) = forward_substitution(&self.l, b)?;
        let (x, back_ops) = back_substitution(&self.u, &y)?;

        Ok(Solved::new(
            x,
            forward_ops + back_ops,
            Status::SolutionObtained,
            Trace::disabled(),
        ))
    }
}

/// Doolittle decomposition of a square matrix.
///
/// For column `j`, `U[i][j]` is filled for rows `0..=j` and `L[i][j]` for rows
/// below. A zero `U[j][j]` fails with `DivisionByZero` once a lower entry
/// needs it; no pivoting is attempted.
pub fn decompose(a: &DMatrix<f64>, config: &SolverConfig) -> Result<Solved<LuFactors>> {
    let n = check_square(a)?;
    let mut trace = Trace::new(config.trace);
    trace.record("input", || format!("A:\n{}", describe_matrix(a)));

    let mut l = DMatrix::identity(n, n);
    let mut u = DMatrix::zeros(n, n);
    let mut ops = 0;

    for j in 0..n {
        for i in 0..=j {
            let mut sum = 0.0;
            for k in 0..i {
                sum += l[(i, k)] * u[(k, j)];
                ops += 1;
            }
            u[(i, j)] = a[(i, j)] - sum;
            ops += 1;
        }

        for i in (j + 1)..n {
            if u[(j, j)] == 0.0 {
                log::debug!("doolittle: zero upper diagonal in column {}", j);
                return Err(Error::DivisionByZero { column: j, ops });
            }
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[(i, k)] * u[(k, j)];
                ops += 1;
            }
            l[(i, j)] = (a[(i, j)] - sum) / u[(j, j)];
            ops += 1;
        }

        trace.record(format!("column {}", j), || {
            format!("L:\n{}\nU:\n{}", describe_matrix(&l), describe_matrix(&u))
        });
    }

    let factors = LuFactors {
        l,
        u,
        kind: FactorKind::Doolittle,
    };
    Ok(Solved::new(factors, ops, Status::FactorizationObtained, trace))
}

/// Cholesky decomposition of a symmetric positive-definite matrix.
///
/// Row `k` of `L` is built from the rows above it; the diagonal entry is
/// `sqrt(A[k][k] - sum(L[k][j]^2))`. A radicand that is not strictly
/// positive fails with `NegativeRadicand`.
pub fn decompose_cholesky(a: &DMatrix<f64>, config: &SolverConfig) -> Result<Solved<LuFactors>> {
    let n = check_square(a)?;
    check_symmetric(a, CHOLESKY_SYMMETRY_TOL)?;

    let mut trace = Trace::new(config.trace);
    trace.record("input", || format!("A:\n{}", describe_matrix(a)));

    let mut l = DMatrix::zeros(n, n);
    let mut ops = 0;

    for k in 0..n {
        for i in 0..k {
            let mut sum = 0.0;
            for j in 0..i {
                sum += l[(i, j)] * l[(k, j)];
                ops += 1;
            }
            l[(k, i)] = (a[(k, i)] - sum) / l[(i, i)];
            ops += 1;
        }

        let mut sum = 0.0;
        for j in 0..k {
            sum += l[(k, j)] * l[(k, j)];
            ops += 1;
        }
        let radicand = a[(k, k)] - sum;
        if radicand <= 0.0 {
            log::debug!("cholesky: radicand {} in row {}", radicand, k);
            return Err(Error::NegativeRadicand {
                row: k,
                value: radicand,
                ops,
            });
        }
        l[(k, k)] = radicand.sqrt();
        ops += 1;

        trace.record(format!("row {}", k), || format!("L:\n{}", describe_matrix(&l)));
    }

    let u = l.transpose();
    let factors = LuFactors {
        l,
        u,
        kind: FactorKind::Cholesky,
    };
    Ok(Solved::new(factors, ops, Status::FactorizationObtained, trace))
}

/// Solve `L y = b` for lower-triangular `L`, first row first.
///
/// Returns the solution and the operation count.
pub fn forward_substitution(l: &DMatrix<f64>, b: &DVector<f64>) -> Result<(DVector<f64>, usize)> {
    let n = check_square(l)?;
    check_len(n, b.len())?;

    let mut y = DVector::zeros(n);
    let mut ops = 0;
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[(i, j)] * y[j];
            ops += 1;
        }
        if l[(i, i)] == 0.0 {
            return Err(Error::SingularMatrix { ops });
        }
        y[i] = (b[i] - sum) / l[(i, i)];
        ops += 1;
    }
    Ok((y, ops))
}

/// Solve `U x = y` for upper-triangular `U`, last row first.
///
/// Returns the solution and the operation count.
pub fn back_substitution(u: &DMatrix<f64>, y: &DVector<f64>) -> Result<(DVector<f64>, usize)> {
    let n = check_square(u)?;
    check_len(n, y.len())?;

    let mut x = DVector::zeros(n);
    let mut ops = 0;
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += u[(i, j)] * x[j];
            ops += 1;
        }
        if u[(i, i)] == 0.0 {
            return Err(Error::SingularMatrix { ops });
        }
        x[i] = (y[i] - sum) / u[(i, i)];
        ops += 1;
    }
    Ok((x, ops))
}

/// Solve `A x = b` through a Doolittle decomposition.
pub fn solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solved<DVector<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.len())?;
    let factored = decompose(a, config)?;
    substitute(factored, b)
}

/// Solve `A x = b` through a Cholesky decomposition.
pub fn solve_cholesky(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solved<DVector<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.len())?;
    let factored = decompose_cholesky(a, config)?;
    substitute(factored, b)
}

fn substitute(factored: Solved<LuFactors>, b: &DVector<f64>) -> Result<Solved<DVector<f64>>> {
    let Solved {
        value: factors,
        ops,
        mut trace,
        ..
    } = factored;

    let (y, forward_ops) =
        forward_substitution(&factors.l, b).map_err(|e| with_extra_ops(e, ops))?;
    trace.record("forward substitution", || describe_vector(&y));

    let (x, back_ops) =
        back_substitution(&factors.u, &y).map_err(|e| with_extra_ops(e, ops + forward_ops))?;
    trace.record("back substitution", || describe_vector(&x));

    Ok(Solved::new(
        x,
        ops + forward_ops + back_ops,
        Status::SolutionObtained,
        trace,
    ))
}

/// Fold the factorization cost into a substitution failure.
fn with_extra_ops(err: Error, extra: usize) -> Error {
    match err {
        Error::SingularMatrix { ops } => Error::SingularMatrix { ops: ops + extra },
        other => other,
    }
}

/// Largest absolute entry of `L * U - a`.
pub fn reconstruction_error(a: &DMatrix<f64>, factors: &LuFactors) -> Result<f64> {
    let lu = product(&factors.l, &factors.u)?;
    check_len(a.nrows(), lu.nrows())?;
    check_len(a.ncols(), lu.ncols())?;
    Ok((lu - a).amax())
}
