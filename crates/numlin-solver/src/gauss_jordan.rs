//! Gauss-Jordan elimination.
//!
//! Each pivot column is handled in one combined pass: the pivot row is
//! normalized, then the column is cleared in every other row, above and
//! below. The augmented block (right-hand side or identity) receives the
//! same row operations, so after the last column it holds the solution or
//! the inverse directly.
//!
//! The determinant is tested before any work is done. No row exchanges are
//! made, so a non-singular matrix with a zero pivot fails with `ZeroPivot`.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::matrix::{
    check_len, check_square, combine_rows, describe_matrix, describe_vector, identity,
    is_singular, scale_row,
};
use crate::solution::{Solved, Status};
use crate::trace::Trace;

/// Solve `A x = b`.
pub fn solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solved<DVector<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.len())?;
    if is_singular(a)? {
        log::debug!("gauss-jordan: determinant is zero");
        return Err(Error::ZeroDeterminant);
    }

    let mut trace = Trace::new(config.trace);
    trace.record("input", || {
        format!("A:\n{}\nb: {}", describe_matrix(a), describe_vector(b))
    });

    let mut work = a.clone();
    let mut aug = DMatrix::from_column_slice(n, 1, b.as_slice());
    let ops = reduce(&mut work, &mut aug, &mut trace)?;

    let x = aug.column(0).into_owned();
    Ok(Solved::new(x, ops, Status::SolutionObtained, trace))
}

/// Compute `A^-1` by reducing `[A | I]` to `[I | A^-1]`.
pub fn inverse(a: &DMatrix<f64>, config: &SolverConfig) -> Result<Solved<DMatrix<f64>>> {
    let n = check_square(a)?;
    if is_singular(a)? {
        log::debug!("gauss-jordan inverse: determinant is zero");
        return Err(Error::ZeroDeterminant);
    }

    let mut trace = Trace::new(config.trace);
    trace.record("input", || format!("A:\n{}", describe_matrix(a)));

    let mut work = a.clone();
    let mut aug = identity(n);
    let ops = reduce(&mut work, &mut aug, &mut trace)?;

    Ok(Solved::new(aug, ops, Status::InverseObtained, trace))
}

/// Reduce `a` to the identity, mirroring every row operation on `aug`.
/// Returns the operation count.
fn reduce(a: &mut DMatrix<f64>, aug: &mut DMatrix<f64>, trace: &mut Trace) -> Result<usize> {
    let n = a.nrows();
    let width = aug.ncols();
    let mut ops = 0;

    for j in 0..n {
        let divisor = a[(j, j)];
        if divisor == 0.0 {
            log::debug!("gauss-jordan: zero pivot in column {}", j);
            return Err(Error::ZeroPivot { column: j, ops });
        }

        scale_row(a, j, divisor);
        scale_row(aug, j, divisor);
        ops += n - j + width;

        for i in (0..n).filter(|&i| i != j) {
            let factor = a[(i, j)];
            if factor == 0.0 {
                continue;
            }
            combine_rows(a, i, j, factor);
            combine_rows(aug, i, j, factor);
            ops += n - j + width;
        }

        trace.record(format!("reduction step {}", j), || {
            format!("A:\n{}\naugment:\n{}", describe_matrix(a), describe_matrix(aug))
        });
    }

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{inverse_residual, max_abs_residual};
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn solves_sample() {
        let a = dmatrix![2.0, 1.0, 7.0; 3.0, 2.0, 1.0; 1.0, 3.0, 0.0];
        let b = dvector![15.0, 14.0, 9.0];

        let solved = solve(&a, &b, &SolverConfig::default()).unwrap();
        assert!(max_abs_residual(&a, &solved.value, &b).unwrap() < 1e-10);
        assert_eq!(solved.status, Status::SolutionObtained);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let a = dmatrix![4.0, 7.0, 2.0; 3.0, 6.0, 1.0; 2.0, 5.0, 3.0];

        let solved = inverse(&a, &SolverConfig::default()).unwrap();
        assert_eq!(solved.status, Status::InverseObtained);
        assert!(inverse_residual(&a, &solved.value).unwrap() < 1e-10);
    }

    #[test]
    fn inverse_of_2x2() {
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let inv = inverse(&a, &SolverConfig::default()).unwrap().value;

        assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
        assert!((inv[(0, 1)] + 0.2).abs() < 1e-12);
        assert!((inv[(1, 0)] + 0.2).abs() < 1e-12);
        assert!((inv[(1, 1)] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn zero_determinant_rejected_up_front() {
        let a = dmatrix![1.0, 2.0; 2.0, 4.0];
        let b = dvector![1.0, 2.0];

        let err = solve(&a, &b, &SolverConfig::default()).unwrap_err();
        assert_eq!(err, Error::ZeroDeterminant);
        assert_eq!(err.ops(), 0);

        assert!(matches!(
            inverse(&a, &SolverConfig::default()),
            Err(Error::ZeroDeterminant)
        ));
    }

    #[test]
    fn zero_pivot_on_non_singular_matrix() {
        let a = dmatrix![0.0, 1.0; 1.0, 0.0];
        let b = dvector![3.0, 4.0];

        assert!(matches!(
            solve(&a, &b, &SolverConfig::default()),
            Err(Error::ZeroPivot { column: 0, ops: 0 })
        ));
    }

    #[test]
    fn zero_pivot_mid_pass_reports_partial_ops() {
        // det = -1, but after clearing column 0 the (1, 1) entry vanishes.
        let a = dmatrix![1.0, 1.0, 0.0; 1.0, 1.0, 1.0; 0.0, 1.0, 1.0];
        let b = dvector![1.0, 1.0, 1.0];

        let err = solve(&a, &b, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ZeroPivot { column: 1, .. }));
        assert!(err.ops() > 0);
    }

    #[test]
    fn non_square_rejected() {
        let a = dmatrix![1.0, 2.0, 3.0; 4.0, 5.0, 6.0];
        assert!(matches!(
            inverse(&a, &SolverConfig::default()),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
