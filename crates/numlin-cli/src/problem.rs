//! Problem files.
//!
//! A problem is a JSON object with a coefficient matrix and, depending on the
//! command, a right-hand side and an initial guess:
//!
//! ```json
//! { "a": [[2, 1], [1, 3]], "b": [5, 6], "x0": [0, 0] }
//! ```
//!
//! `b` may also be a matrix (one right-hand side per column).

use std::path::Path;

use anyhow::{Context, Result, bail};
use nalgebra::{DMatrix, DVector};
use numlin_solver::matrix;
use serde::Deserialize;

/// Right-hand side as written in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RhsSpec {
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, Deserialize)]
struct ProblemSpec {
    a: Vec<Vec<f64>>,
    #[serde(default)]
    b: Option<RhsSpec>,
    #[serde(default)]
    x0: Option<Vec<f64>>,
}

/// Right-hand side converted to nalgebra types.
#[derive(Debug, Clone)]
pub enum Rhs {
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

/// A parsed problem.
#[derive(Debug, Clone)]
pub struct Problem {
    pub a: DMatrix<f64>,
    pub b: Option<Rhs>,
    pub x0: Option<DVector<f64>>,
}

impl Problem {
    /// Parse a problem from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let spec: ProblemSpec = serde_json::from_str(text).context("invalid problem JSON")?;

        let a = matrix::from_rows(&spec.a).context("invalid coefficient matrix")?;
        let b = match spec.b {
            None => None,
            Some(RhsSpec::Vector(v)) => Some(Rhs::Vector(DVector::from_vec(v))),
            Some(RhsSpec::Matrix(rows)) => Some(Rhs::Matrix(
                matrix::from_rows(&rows).context("invalid right-hand-side matrix")?,
            )),
        };
        let x0 = spec.x0.map(DVector::from_vec);

        Ok(Self { a, b, x0 })
    }

    /// Read and parse a problem file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// The right-hand side as a vector.
    pub fn rhs_vector(&self) -> Result<&DVector<f64>> {
        match &self.b {
            Some(Rhs::Vector(b)) => Ok(b),
            Some(Rhs::Matrix(_)) => bail!("this method takes a single right-hand-side vector"),
            None => bail!("problem has no right-hand side \"b\""),
        }
    }

    /// The initial guess, or zeros.
    pub fn initial_guess(&self) -> DVector<f64> {
        self.x0
            .clone()
            .unwrap_or_else(|| DVector::zeros(self.a.nrows()))
    }
}
