//! Error types for the linear solvers.

use thiserror::Error;

/// Errors that can occur while solving a linear system or decomposing a matrix.
///
/// Every failure is local and recoverable. Variants raised part-way through a
/// computation carry the element-wise operation count spent before the abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inputs disagree in size.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The system has no unknowns.
    #[error("matrix is empty")]
    EmptyMatrix,

    /// The up-front determinant test found a zero determinant.
    #[error("determinant is zero")]
    ZeroDeterminant,

    /// A zero diagonal was met during substitution, or a row was entirely zero.
    #[error("matrix is singular")]
    SingularMatrix { ops: usize },

    /// The pivot element of a column is exactly zero.
    #[error("pivot element is zero in column {column}")]
    ZeroPivot { column: usize, ops: usize },

    /// A diagonal element required by an iterative method is zero.
    #[error("diagonal element is zero in row {row}")]
    ZeroDiagonal { row: usize, ops: usize },

    /// Doolittle factorization met a zero upper-factor diagonal.
    #[error("division by zero: upper factor diagonal is zero in column {column}")]
    DivisionByZero { column: usize, ops: usize },

    /// Cholesky factorization met a non-positive value under the square root.
    #[error("value under square root is not positive in row {row} ({value})")]
    NegativeRadicand { row: usize, value: f64, ops: usize },

    /// The matrix is not symmetric where symmetry is required.
    #[error("matrix is not symmetric at ({row}, {col})")]
    NotSymmetric { row: usize, col: usize },

    /// An iterative method ran out of iterations.
    #[error("maximum iterations reached ({iterations})")]
    MaxIterationsReached { iterations: usize },
}

impl Error {
    /// Element-wise operations performed before the failure.
    pub fn ops(&self) -> usize {
        match self {
            Error::SingularMatrix { ops }
            | Error::ZeroPivot { ops, .. }
            | Error::ZeroDiagonal { ops, .. }
            | Error::DivisionByZero { ops, .. }
            | Error::NegativeRadicand { ops, .. } => *ops,
            _ => 0,
        }
    }

    /// Whether the failure indicates the matrix has no unique solution
    /// (or, for the non-pivoting variants, that one could not be reached).
    pub fn is_singularity(&self) -> bool {
        matches!(
            self,
            Error::ZeroDeterminant
                | Error::SingularMatrix { .. }
                | Error::ZeroPivot { .. }
                | Error::DivisionByZero { .. }
        )
    }
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;
