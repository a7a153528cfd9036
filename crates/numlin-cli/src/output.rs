//! Text and JSON output for solver results.

use nalgebra::{DMatrix, DVector};
use numlin_solver::{EigenDecomposition, IterativeSolution, LuFactors, Solved, Trace, matrix};
use serde::Serialize;

/// JSON form of any command's result.
#[derive(Debug, Serialize)]
pub struct Report {
    pub method: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eigenvalues: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eigenvectors: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_diagonal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual: Option<f64>,
}

impl Report {
    fn new(method: &str, status: impl ToString) -> Self {
        Self {
            method: method.to_string(),
            status: status.to_string(),
            ops: None,
            iterations: None,
            x: None,
            matrix: None,
            l: None,
            u: None,
            eigenvalues: None,
            eigenvectors: None,
            off_diagonal: None,
            residual: None,
        }
    }

    /// Report for a direct solve with a single right-hand side.
    pub fn vector(method: &str, solved: &Solved<DVector<f64>>, residual: Option<f64>) -> Self {
        Self {
            ops: Some(solved.ops),
            x: Some(solved.value.iter().copied().collect()),
            residual,
            ..Self::new(method, solved.status)
        }
    }

    /// Report for a solution matrix or an inverse.
    pub fn matrix(method: &str, solved: &Solved<DMatrix<f64>>, residual: Option<f64>) -> Self {
        Self {
            ops: Some(solved.ops),
            matrix: Some(matrix::to_rows(&solved.value)),
            residual,
            ..Self::new(method, solved.status)
        }
    }

    /// Report for a factorization.
    pub fn factors(method: &str, solved: &Solved<LuFactors>, residual: Option<f64>) -> Self {
        Self {
            ops: Some(solved.ops),
            l: Some(matrix::to_rows(&solved.value.l)),
            u: Some(matrix::to_rows(&solved.value.u)),
            residual,
            ..Self::new(method, solved.status)
        }
    }

    /// Report for an iterative solve.
    pub fn iterative(method: &str, solution: &IterativeSolution, residual: Option<f64>) -> Self {
        Self {
            ops: Some(solution.ops),
            iterations: Some(solution.iterations),
            x: Some(solution.x.iter().copied().collect()),
            residual,
            ..Self::new(method, solution.status)
        }
    }

    /// Report for an eigen-decomposition. Eigenvectors are listed one per row.
    pub fn eigen(eig: &EigenDecomposition) -> Self {
        Self {
            iterations: Some(eig.iterations),
            eigenvalues: Some(eig.eigenvalues.iter().copied().collect()),
            eigenvectors: Some(eig.pairs().map(|(_, v)| v.iter().copied().collect()).collect()),
            off_diagonal: Some(eig.off_diagonal),
            ..Self::new("jacobi-eigen", eig.status)
        }
    }
}

fn print_matrix(name: &str, m: &DMatrix<f64>) {
    println!("{}:", name);
    for row in m.row_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>14.6e}", v)).collect();
        println!("  [{}]", cells.join(", "));
    }
}

fn print_vector(name: &str, v: &DVector<f64>) {
    println!("{}:", name);
    for (i, value) in v.iter().enumerate() {
        println!("  {}[{}] = {:.10}", name, i, value);
    }
}

fn print_trace(trace: &Trace) {
    if trace.is_enabled() {
        println!("{}", trace);
    }
}

fn print_residual(residual: Option<f64>) {
    if let Some(r) = residual {
        println!("Max |residual|: {:.3e}", r);
    }
}

/// Print a direct solve.
pub fn print_vector_solution(method: &str, solved: &Solved<DVector<f64>>, residual: Option<f64>) {
    print_trace(&solved.trace);
    println!("{}: {}", method, solved.status);
    print_vector("x", &solved.value);
    println!("Element-wise operations: {}", solved.ops);
    print_residual(residual);
}

/// Print a solution matrix or an inverse.
pub fn print_matrix_solution(method: &str, solved: &Solved<DMatrix<f64>>, residual: Option<f64>) {
    print_trace(&solved.trace);
    println!("{}: {}", method, solved.status);
    print_matrix("X", &solved.value);
    println!("Element-wise operations: {}", solved.ops);
    print_residual(residual);
}

/// Print a factorization.
pub fn print_factors(method: &str, solved: &Solved<LuFactors>, residual: Option<f64>) {
    print_trace(&solved.trace);
    println!("{}: {}", method, solved.status);
    print_matrix("L", &solved.value.l);
    print_matrix("U", &solved.value.u);
    println!("Element-wise operations: {}", solved.ops);
    if let Some(r) = residual {
        println!("Max |L*U - A|: {:.3e}", r);
    }
}

/// Print an iterative solve.
pub fn print_iterative(method: &str, solution: &IterativeSolution, residual: Option<f64>) {
    print_trace(&solution.trace);
    println!(
        "{}: {} after {} iterations",
        method, solution.status, solution.iterations
    );
    print_vector("x", &solution.x);
    println!("Last relative change: {:.3e}", solution.relative_error);
    println!("Element-wise operations: {}", solution.ops);
    print_residual(residual);
}

/// Print an eigen-decomposition.
pub fn print_eigen(eig: &EigenDecomposition) {
    print_trace(&eig.trace);
    println!("Jacobi eigen: {} after {} rotations", eig.status, eig.iterations);
    for (i, (lambda, v)) in eig.pairs().enumerate() {
        let cells: Vec<String> = v.iter().map(|c| format!("{:.6}", c)).collect();
        println!("  lambda[{}] = {:.10}  v = [{}]", i, lambda, cells.join(", "));
    }
    println!("Largest off-diagonal: {:.3e}", eig.off_diagonal);
}
