//! Gaussian elimination with back substitution.
//!
//! Two named variants with distinct failure domains:
//!
//! - [`solve_plain`] never exchanges rows and fails with `ZeroPivot` as soon
//!   as a diagonal pivot is zero, even when the system is solvable.
//! - [`solve_pivoted`] / [`solve_pivoted_multi`] use scaled partial pivoting
//!   and can solve several right-hand sides with one elimination sequence.
//!
//! Inputs are borrowed and copied on entry.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::matrix::{
    check_len, check_square, combine_rows, describe_matrix, describe_vector, swap_rows,
};
use crate::solution::{Solved, Status};
use crate::trace::Trace;

/// Solve `A x = b` without row exchanges.
pub fn solve_plain(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solved<DVector<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.len())?;

    let mut a = a.clone();
    let mut rhs = DMatrix::from_column_slice(n, 1, b.as_slice());
    let mut ops = 0;
    let mut trace = Trace::new(config.trace);
    trace.record("input", || {
        format!("A:\n{}\nb: {}", describe_matrix(&a), describe_vector(b))
    });

    for j in 0..n {
        let divisor = a[(j, j)];
        if divisor == 0.0 {
            log::debug!("plain elimination: zero pivot in column {}", j);
            return Err(Error::ZeroPivot { column: j, ops });
        }
        eliminate_below(&mut a, &mut rhs, j, n, &mut ops);
        trace.record(format!("elimination step {}", j), || {
            format!("A:\n{}\nb:\n{}", describe_matrix(&a), describe_matrix(&rhs))
        });
    }

    back_substitute(&a, &mut rhs, &mut ops, &mut trace)?;

    let x = rhs.column(0).into_owned();
    Ok(Solved::new(x, ops, Status::SolutionObtained, trace))
}

/// Solve `A x = b` with scaled partial pivoting.
pub fn solve_pivoted(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Solved<DVector<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.len())?;

    let rhs = DMatrix::from_column_slice(n, 1, b.as_slice());
    let solved = solve_pivoted_multi(a, &rhs, config)?;
    let mut solved = solved.map(|x| x.column(0).into_owned());
    solved.status = Status::SolutionObtained;
    Ok(solved)
}

/// Solve `A X = B` for every column of `B` with scaled partial pivoting.
///
/// Before eliminating column `j`, each candidate row `i >= j` is scored by
/// `|A[i][j]| / max_k |A[i][k]|` and the best-scoring row is swapped into
/// place together with its right-hand-side row. Ties keep the upper row.
pub fn solve_pivoted_multi(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    config: &SolverConfig,
) -> Result<Solved<DMatrix<f64>>> {
    let n = check_square(a)?;
    check_len(n, b.nrows())?;
    if b.ncols() == 0 {
        return Err(Error::EmptyMatrix);
    }

    let mut a = a.clone();
    let mut rhs = b.clone();
    let mut ops = 0;
    let row_cost = n + rhs.ncols();
    let mut trace = Trace::new(config.trace);
    trace.record("input", || {
        format!("A:\n{}\nB:\n{}", describe_matrix(&a), describe_matrix(&rhs))
    });

    for j in 0..n {
        let pivot = select_pivot(&a, j, &mut ops)?;
        if pivot != j {
            swap_rows(&mut a, pivot, j);
            swap_rows(&mut rhs, pivot, j);
            trace.record(format!("swap in column {}", j), || {
                format!("swapped row {} with row {}", j, pivot)
            });
        }

        if a[(j, j)] == 0.0 {
            log::debug!("pivoted elimination: zero pivot in column {}", j);
            return Err(Error::ZeroPivot { column: j, ops });
        }
        eliminate_below(&mut a, &mut rhs, j, row_cost, &mut ops);
        trace.record(format!("elimination step {}", j), || {
            format!("A:\n{}\nB:\n{}", describe_matrix(&a), describe_matrix(&rhs))
        });
    }

    back_substitute(&a, &mut rhs, &mut ops, &mut trace)?;

    Ok(Solved::new(rhs, ops, Status::SolutionsObtained, trace))
}

/// Index of the best scaled pivot candidate for column `j`.
fn select_pivot(a: &DMatrix<f64>, j: usize, ops: &mut usize) -> Result<usize> {
    let n = a.nrows();
    let mut best = j;
    let mut best_scale = 0.0;

    for i in j..n {
        let row_max = a.row(i).amax();
        if row_max == 0.0 {
            log::debug!("pivoted elimination: row {} is entirely zero", i);
            return Err(Error::SingularMatrix { ops: *ops });
        }
        let scale = a[(i, j)].abs() / row_max;
        *ops += n + 1;

        if scale > best_scale {
            best = i;
            best_scale = scale;
        }
    }

    if best_scale == 0.0 {
        log::debug!("pivoted elimination: column {} has no non-zero candidate", j);
        return Err(Error::SingularMatrix { ops: *ops });
    }
    Ok(best)
}

/// Zero the entries below the pivot of column `j`, applying the same row
/// operations to every right-hand-side column. Each eliminated row costs
/// `row_cost` operations.
fn eliminate_below(
    a: &mut DMatrix<f64>,
    rhs: &mut DMatrix<f64>,
    j: usize,
    row_cost: usize,
    ops: &mut usize,
) {
    let n = a.nrows();
    let divisor = a[(j, j)];
    for i in (j + 1)..n {
        let factor = a[(i, j)] / divisor;
        combine_rows(a, i, j, factor);
        combine_rows(rhs, i, j, factor);
        *ops += row_cost;
    }
}

/// Solve the upper-triangular system in place, last row first.
fn back_substitute(
    a: &DMatrix<f64>,
    rhs: &mut DMatrix<f64>,
    ops: &mut usize,
    trace: &mut Trace,
) -> Result<()> {
    let n = a.nrows();
    for i in (0..n).rev() {
        let divisor = a[(i, i)];
        for c in 0..rhs.ncols() {
            for k in (i + 1)..n {
                rhs[(i, c)] -= a[(i, k)] * rhs[(k, c)];
                *ops += 1;
            }
            if divisor == 0.0 {
                log::debug!("back substitution: zero diagonal in row {}", i);
                return Err(Error::SingularMatrix { ops: *ops });
            }
            rhs[(i, c)] /= divisor;
            *ops += 1;
        }
        trace.record(format!("back substitution row {}", i), || {
            describe_matrix(rhs)
        });
    }
    Ok(())
}
