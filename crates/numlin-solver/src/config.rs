//! Solver configuration.
//!
//! Each family of solvers takes a small configuration struct with sensible
//! defaults and `with_*` builders.

/// Configuration for the direct solvers (Gaussian, Gauss-Jordan, LU).
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Record intermediate state in the returned trace.
    pub trace: bool,
}

impl SolverConfig {
    /// Enable or disable step tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Update rule used by the iterative solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterativeMethod {
    /// Every component is updated from the previous sweep only.
    #[default]
    Jacobi,
    /// Components updated earlier in a sweep are used immediately.
    GaussSeidel,
}

impl IterativeMethod {
    /// Parse from a string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "jacobi" => Some(Self::Jacobi),
            "gauss-seidel" | "gaussseidel" | "seidel" | "gs" => Some(Self::GaussSeidel),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jacobi => "Jacobi",
            Self::GaussSeidel => "Gauss-Seidel",
        }
    }
}

/// Configuration for the Jacobi / Gauss-Seidel relaxation solver.
#[derive(Debug, Clone)]
pub struct IterativeConfig {
    /// Update rule.
    pub method: IterativeMethod,
    /// Relaxation weight λ. 1.0 is the plain method, other values over/under-relax.
    pub relaxation: f64,
    /// Relative-change threshold every component must fall below.
    pub tol: f64,
    /// Sweep cap. The run stops once the sweep count, which includes the
    /// initial un-weighted sweep, exceeds it.
    pub max_iter: usize,
    /// Components with `|x_new[i]| <= zero_threshold` are left out of the
    /// convergence test. 0.0 skips exact zeros only.
    pub zero_threshold: f64,
    /// Record intermediate state in the returned trace.
    pub trace: bool,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            method: IterativeMethod::Jacobi,
            relaxation: 1.0,
            tol: 1e-8,
            max_iter: 10_000,
            zero_threshold: 0.0,
            trace: false,
        }
    }
}

impl IterativeConfig {
    /// Plain Jacobi iteration with default limits.
    pub fn jacobi() -> Self {
        Self::default()
    }

    /// Gauss-Seidel iteration with default limits.
    pub fn gauss_seidel() -> Self {
        Self {
            method: IterativeMethod::GaussSeidel,
            ..Default::default()
        }
    }

    /// Set the update rule.
    pub fn with_method(mut self, method: IterativeMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the relaxation weight.
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Set the relative error threshold.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the magnitude below which components skip the convergence test.
    pub fn with_zero_threshold(mut self, zero_threshold: f64) -> Self {
        self.zero_threshold = zero_threshold;
        self
    }

    /// Enable or disable step tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Configuration for the Jacobi eigenvalue solver.
#[derive(Debug, Clone)]
pub struct EigenConfig {
    /// Largest off-diagonal magnitude accepted as converged.
    pub tol: f64,
    /// Maximum number of rotations.
    pub max_iter: usize,
    /// Relative tolerance for the symmetry check on input.
    pub symmetry_tol: f64,
    /// Record intermediate state in the returned trace.
    pub trace: bool,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            tol: 1e-9,
            max_iter: 10_000,
            symmetry_tol: 1e-12,
            trace: false,
        }
    }
}

impl EigenConfig {
    /// Set the off-diagonal threshold.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the rotation cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the symmetry tolerance.
    pub fn with_symmetry_tol(mut self, symmetry_tol: f64) -> Self {
        self.symmetry_tol = symmetry_tol;
        self
    }

    /// Enable or disable step tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterative_config_default() {
        let config = IterativeConfig::default();
        assert_eq!(config.method, IterativeMethod::Jacobi);
        assert!((config.relaxation - 1.0).abs() < 1e-15);
        assert!((config.tol - 1e-8).abs() < 1e-20);
        assert_eq!(config.max_iter, 10_000);
        assert_eq!(config.zero_threshold, 0.0);
        assert!(!config.trace);
    }

    #[test]
    fn iterative_config_builders() {
        let config = IterativeConfig::gauss_seidel()
            .with_relaxation(1.2)
            .with_tol(1e-4)
            .with_max_iter(25)
            .with_trace(true);
        assert_eq!(config.method, IterativeMethod::GaussSeidel);
        assert!((config.relaxation - 1.2).abs() < 1e-15);
        assert_eq!(config.max_iter, 25);
        assert!(config.trace);
    }

    #[test]
    fn eigen_config_default() {
        let config = EigenConfig::default();
        assert!((config.tol - 1e-9).abs() < 1e-20);
        assert_eq!(config.max_iter, 10_000);
    }

    #[test]
    fn method_from_name() {
        assert_eq!(
            IterativeMethod::from_name("Jacobi"),
            Some(IterativeMethod::Jacobi)
        );
        assert_eq!(
            IterativeMethod::from_name("gauss-seidel"),
            Some(IterativeMethod::GaussSeidel)
        );
        assert_eq!(IterativeMethod::from_name("sor"), None);
    }
}
