use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use super::error::EvalError;
use super::evaluation_report::EvaluationReport;
use super::record::Record;
use super::rule::CompiledRule;
use super::ruleset::Ruleset;
use super::verdict::Verdict;
use crate::parse::ParseOptions;

/// A compiled, immutable ruleset. Thread-safe and designed to live behind `Arc`.
///
/// Built by [`Interpreter::new()`], which validates the document and parses
/// every condition up front. Evaluation never mutates the interpreter, so one
/// instance serves any number of concurrent callers.
#[derive(Debug)]
pub struct Interpreter {
    pub(crate) name: String,
    pub(crate) variables: BTreeSet<String>,
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) default: String,
    pub(crate) options: ParseOptions,
}

impl Interpreter {
    /// Compile a ruleset with default [`ParseOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`](crate::Error::Schema) for structural problems
    /// and [`Error::Compile`](crate::Error::Compile) for the first rule whose
    /// condition fails to parse.
    pub fn new(ruleset: &Ruleset) -> Result<Self, crate::Error> {
        Self::with_options(ruleset, ParseOptions::default())
    }

    /// Compile a ruleset with explicit parse options.
    ///
    /// # Errors
    ///
    /// Same as [`new()`](Self::new).
    pub fn with_options(ruleset: &Ruleset, options: ParseOptions) -> Result<Self, crate::Error> {
        crate::compile::compile(ruleset, options)
    }

    /// Parse a JSON ruleset document and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on JSON, schema, or compile failure.
    pub fn from_json(input: &str) -> Result<Self, crate::Error> {
        Self::new(&Ruleset::from_json(input)?)
    }

    /// Read a JSON ruleset document from disk and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on I/O, JSON, schema, or compile failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        Self::new(&Ruleset::from_file(path)?)
    }

    /// Evaluate a record against the rules in declaration order.
    ///
    /// Returns the verdict of the first rule whose condition holds, or the
    /// default outcome if none does.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if the record lacks a declared variable or holds
    /// a non-boolean value for one. Checked before any rule is tested.
    pub fn evaluate(&self, record: &Record) -> Result<Verdict, EvalError> {
        crate::evaluate::evaluate(&self.rules, &self.variables, &self.default, record, |_, _| {})
    }

    /// Evaluate with detailed diagnostics.
    ///
    /// Returns an [`EvaluationReport`] with the verdict, each rule tested
    /// with its result, and timing information.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate()`](Self::evaluate).
    pub fn evaluate_detailed(&self, record: &Record) -> Result<EvaluationReport, EvalError> {
        let start = Instant::now();
        let (verdict, checks) =
            crate::evaluate::evaluate_traced(&self.rules, &self.variables, &self.default, record)?;
        Ok(EvaluationReport::new(verdict, checks, start.elapsed()))
    }

    /// Evaluate many records. A failing record only fails its own entry.
    #[must_use]
    pub fn evaluate_batch<'a>(
        &self,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Vec<Result<Verdict, EvalError>> {
        records
            .into_iter()
            .map(|record| self.evaluate(record))
            .collect()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn default_outcome(&self) -> &str {
        &self.default
    }

    #[must_use]
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Rule ids in evaluation (declaration) order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }

    /// The original condition text of a rule, or `None` if the id is unknown.
    #[must_use]
    pub fn condition_of(&self, rule_id: &str) -> Option<&str> {
        self.find(rule_id).map(|r| r.when.as_str())
    }

    /// Variables referenced by a rule's condition, or `None` if the id is unknown.
    #[must_use]
    pub fn variables_of(&self, rule_id: &str) -> Option<Vec<&str>> {
        self.find(rule_id).map(|r| r.expression.variables())
    }

    fn find(&self, rule_id: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interpreter({}: {} rules, {} variables, default {})",
            self.name,
            self.rules.len(),
            self.variables.len(),
            self.default,
        )
    }
}
