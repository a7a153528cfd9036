//! Jacobi and Gauss-Seidel relaxation.
//!
//! Each row is first normalized by its diagonal element. One un-weighted
//! sweep is made from the initial guess, then weighted sweeps
//!
//! ```text
//! x_new[i] = λ·(b[i] - Σ_{j≠i} A[i][j]·x[j]) + (1 - λ)·x[i]
//! ```
//!
//! repeat until every component's relative change `|Δx[i] / x_new[i]|` is
//! within the threshold. Components whose new value is zero (or within the
//! configured zero threshold) are left out of that test, so a coordinate that
//! sits exactly at zero can hide non-convergence.
//!
//! Running out of iterations is not an error: once the sweep counter exceeds
//! `max_iter` the current estimate is returned with
//! [`Status::MaxIterationsReached`].

use nalgebra::{DMatrix, DVector};

use crate::config::{IterativeConfig, IterativeMethod};
use crate::error::{Error, Result};
use crate::matrix::{check_len, check_square, describe_matrix, describe_vector, scale_row};
use crate::solution::Status;
use crate::trace::Trace;

/// Output of an iterative solve.
#[derive(Debug, Clone)]
pub struct IterativeSolution {
    /// Final estimate.
    pub x: DVector<f64>,
    /// Sweeps performed, including the initial un-weighted one.
    pub iterations: usize,
    /// Element-wise arithmetic operations performed.
    pub ops: usize,
    /// Largest relative change among tested components in the last sweep.
    pub relative_error: f64,
    /// `Converged` or `MaxIterationsReached`.
    pub status: Status,
    /// Intermediate state, if tracing was enabled.
    pub trace: Trace,
}

impl IterativeSolution {
    /// Whether the threshold was met.
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }

    /// The estimate if it converged, `MaxIterationsReached` otherwise.
    pub fn into_converged(self) -> Result<DVector<f64>> {
        if self.converged() {
            Ok(self.x)
        } else {
            Err(Error::MaxIterationsReached {
                iterations: self.iterations,
            })
        }
    }
}

/// Solve `A x = b` iteratively from the initial guess `x0`.
pub fn solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    config: &IterativeConfig,
) -> Result<IterativeSolution> {
    let n = check_square(a)?;
    check_len(n, b.len())?;
    check_len(n, x0.len())?;

    let mut trace = Trace::new(config.trace);
    trace.record("input", || {
        format!(
            "{} iteration\nA:\n{}\nb: {}\nx0: {}",
            config.method.name(),
            describe_matrix(a),
            describe_vector(b),
            describe_vector(x0)
        )
    });

    let mut a = a.clone();
    let mut b = b.clone();
    let mut ops = 0;

    for i in 0..n {
        let divisor = a[(i, i)];
        if divisor == 0.0 {
            log::debug!("{}: zero diagonal in row {}", config.method.name(), i);
            return Err(Error::ZeroDiagonal { row: i, ops });
        }
        scale_row(&mut a, i, divisor);
        b[i] /= divisor;
        ops += n + 1;
    }

    let mut x = sweep(&a, &b, x0, config.method, 1.0);
    ops += n.saturating_sub(1);
    let mut iterations = 1;
    let mut relative_error = f64::INFINITY;
    trace.record("iteration 1", || describe_vector(&x));

    while iterations <= config.max_iter {
        let next = sweep(&a, &b, &x, config.method, config.relaxation);
        ops += n * (n + 1);
        iterations += 1;

        relative_error = max_relative_change(&x, &next, config.zero_threshold);
        x = next;
        trace.record(format!("iteration {}", iterations), || {
            format!("x: {}\nrelative change: {:e}", describe_vector(&x), relative_error)
        });

        if relative_error <= config.tol {
            log::debug!(
                "{} converged after {} iterations",
                config.method.name(),
                iterations
            );
            return Ok(IterativeSolution {
                x,
                iterations,
                ops,
                relative_error,
                status: Status::Converged,
                trace,
            });
        }
    }

    log::warn!(
        "{} did not converge after {} iterations (relative change {:e})",
        config.method.name(),
        iterations,
        relative_error
    );
    Ok(IterativeSolution {
        x,
        iterations,
        ops,
        relative_error,
        status: Status::MaxIterationsReached,
        trace,
    })
}

/// One full sweep over the normalized system.
///
/// Jacobi reads only `x`; Gauss-Seidel reads components already updated in
/// this sweep.
fn sweep(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x: &DVector<f64>,
    method: IterativeMethod,
    relaxation: f64,
) -> DVector<f64> {
    let n = x.len();
    let mut next = x.clone();

    for i in 0..n {
        let current = {
            let source = match method {
                IterativeMethod::Jacobi => x,
                IterativeMethod::GaussSeidel => &next,
            };
            let off_diagonal: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| a[(i, j)] * source[j])
                .sum();
            b[i] - off_diagonal
        };
        next[i] = relaxation * current + (1.0 - relaxation) * x[i];
    }

    next
}

/// Largest `|(next[i] - prev[i]) / next[i]|` over components with
/// `|next[i]| > zero_threshold`. Zero when every component is skipped.
fn max_relative_change(prev: &DVector<f64>, next: &DVector<f64>, zero_threshold: f64) -> f64 {
    prev.iter()
        .zip(next.iter())
        .filter(|&(_, &new)| new.abs() > zero_threshold)
        .map(|(&old, &new)| ((new - old) / new).abs())
        .fold(0.0, f64::max)
}
