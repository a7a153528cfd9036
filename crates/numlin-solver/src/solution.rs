//! Result types shared by the direct solvers.

use std::fmt;

use crate::trace::Trace;

/// Outcome classification reported alongside a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A single right-hand side was solved.
    SolutionObtained,
    /// Several right-hand sides were solved at once.
    SolutionsObtained,
    /// A matrix inverse was computed.
    InverseObtained,
    /// A triangular factorization was computed.
    FactorizationObtained,
    /// An iterative method met its error threshold.
    Converged,
    /// An iterative method stopped at its iteration cap.
    MaxIterationsReached,
    /// Eigenvalues and eigenvectors were extracted.
    EigenpairsObtained,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::SolutionObtained => "solution obtained",
            Status::SolutionsObtained => "solutions obtained",
            Status::InverseObtained => "inverse obtained",
            Status::FactorizationObtained => "factorization obtained",
            Status::Converged => "approximate solution obtained",
            Status::MaxIterationsReached => "maximum iterations reached",
            Status::EigenpairsObtained => "eigenpairs obtained",
        };
        f.write_str(text)
    }
}

/// Output of a direct method.
#[derive(Debug, Clone)]
pub struct Solved<T> {
    /// Solution vector, solution matrix, inverse or factors.
    pub value: T,
    /// Element-wise arithmetic operations performed.
    pub ops: usize,
    /// Outcome classification.
    pub status: Status,
    /// Intermediate state, if tracing was enabled.
    pub trace: Trace,
}

impl<T> Solved<T> {
    pub(crate) fn new(value: T, ops: usize, status: Status, trace: Trace) -> Self {
        Self {
            value,
            ops,
            status,
            trace,
        }
    }

    /// Discard the diagnostics and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Solved<U> {
        Solved {
            value: f(self.value),
            ops: self.ops,
            status: self.status,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(Status::SolutionObtained.to_string(), "solution obtained");
        assert_eq!(
            Status::MaxIterationsReached.to_string(),
            "maximum iterations reached"
        );
    }

    #[test]
    fn map_keeps_diagnostics() {
        let solved = Solved::new(2, 7, Status::SolutionObtained, Trace::disabled());
        let mapped = solved.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert_eq!(mapped.ops, 7);
        assert_eq!(mapped.status, Status::SolutionObtained);
    }
}
