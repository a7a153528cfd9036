//! Step-by-step trace of a solver run.
//!
//! When enabled, solvers record a labelled snapshot after each elimination,
//! substitution, iteration or rotation step. Recording only formats state
//! that the solver already holds, so enabling it never changes results.

use std::fmt;

/// A single recorded step.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// Short label, e.g. "elimination step 2".
    pub label: String,
    /// Formatted intermediate state.
    pub detail: String,
}

/// Ordered log of intermediate solver state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    enabled: bool,
    steps: Vec<TraceStep>,
}

impl Trace {
    /// Create a trace that records only when `enabled` is true.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            steps: Vec::new(),
        }
    }

    /// A trace that records nothing.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether steps are being recorded.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a step. The detail closure only runs when the trace is enabled.
    pub fn record<F>(&mut self, label: impl Into<String>, detail: F)
    where
        F: FnOnce() -> String,
    {
        if !self.enabled {
            return;
        }
        let step = TraceStep {
            label: label.into(),
            detail: detail(),
        };
        log::debug!("{}: {}", step.label, step.detail);
        self.steps.push(step);
    }

    /// Recorded steps in order.
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step.label)?;
            writeln!(f, "{}", "-".repeat(step.label.len()))?;
            writeln!(f, "{}", step.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_trace_skips_formatting() {
        let mut trace = Trace::disabled();
        trace.record("step", || panic!("detail must not be formatted"));
        assert!(trace.is_empty());
    }

    #[test]
    fn enabled_trace_keeps_order() {
        let mut trace = Trace::new(true);
        trace.record("first", || "a".to_string());
        trace.record("second", || "b".to_string());

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].label, "first");
        assert_eq!(trace.steps()[1].detail, "b");
        assert!(trace.to_string().contains("second\n------\nb"));
    }
}
