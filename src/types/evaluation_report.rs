use std::fmt;
use std::time::Duration;

use super::verdict::Verdict;

/// One rule tested during an evaluation, with the value its condition produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCheck {
    pub rule: String,
    pub result: bool,
}

/// Detailed evaluation report returned by
/// [`Interpreter::evaluate_detailed()`](super::Interpreter::evaluate_detailed).
///
/// Contains the verdict, every rule tested with its result, and the
/// wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    verdict: Verdict,
    checks: Vec<RuleCheck>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(verdict: Verdict, checks: Vec<RuleCheck>, duration: Duration) -> Self {
        Self {
            verdict,
            checks,
            duration,
        }
    }

    /// The verdict, same as [`Interpreter::evaluate()`](super::Interpreter::evaluate).
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Rules in the order they were tested. Only the last can be `true`.
    #[must_use]
    pub fn checks(&self) -> &[RuleCheck] {
        &self.checks
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn into_verdict(self) -> Verdict {
        self.verdict
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "verdict: {}", self.verdict)?;
        let checks: Vec<String> = self
            .checks
            .iter()
            .map(|c| format!("{}={}", c.rule, c.result))
            .collect();
        write!(f, ", checks: [{}]", checks.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
