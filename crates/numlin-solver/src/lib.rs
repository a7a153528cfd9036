//! Classical dense linear-system solvers and Jacobi eigen-decomposition.
//!
//! Every solver is a stateless function over borrowed inputs. Matrices are
//! copied on entry, so callers' data is never mutated, and each call returns
//! its result together with an operation count, a status and an optional
//! step trace.
//!
//! # Solvers
//!
//! - [`gaussian`] - plain and scaled-partial-pivoting Gaussian elimination
//! - [`gauss_jordan`] - single-pass Gauss-Jordan solve and matrix inverse
//! - [`lu`] - Doolittle and Cholesky decomposition with substitution
//! - [`iterative`] - Jacobi / Gauss-Seidel relaxation
//! - [`eigen`] - Jacobi rotation eigenvalue method
//!
//! Shared row operations and residual checks live in [`matrix`].
//!
//! # Example
//!
//! ```
//! use nalgebra::{dmatrix, dvector};
//! use numlin_solver::{SolverConfig, gaussian, matrix};
//!
//! let a = dmatrix![2.0, 1.0, 7.0; 3.0, 2.0, 1.0; 1.0, 3.0, 0.0];
//! let b = dvector![15.0, 14.0, 9.0];
//!
//! let solved = gaussian::solve_pivoted(&a, &b, &SolverConfig::default()).unwrap();
//! assert!(matrix::max_abs_residual(&a, &solved.value, &b).unwrap() < 1e-10);
//! println!("{} after {} operations", solved.status, solved.ops);
//! ```

pub mod config;
pub mod eigen;
pub mod error;
pub mod gauss_jordan;
pub mod gaussian;
pub mod iterative;
pub mod lu;
pub mod matrix;
pub mod solution;
pub mod trace;

pub use config::{EigenConfig, IterativeConfig, IterativeMethod, SolverConfig};
pub use eigen::{EigenDecomposition, PlaneRotation, jacobi_eigen};
pub use error::{Error, Result};
pub use iterative::IterativeSolution;
pub use lu::{FactorKind, LuFactors};
pub use solution::{Solved, Status};
pub use trace::{Trace, TraceStep};
