use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::interpreter::Interpreter;
use super::record::Record;
use super::rule::Rule;
use crate::parse::ParseOptions;

/// A ruleset document: declared variables, rules in evaluation order, and
/// the outcome used when no rule matches.
///
/// Immutable input to [`Interpreter::new()`]. Missing `rules` or `default`
/// members deserialize as empty and are reported by
/// [`validate()`](Self::validate) as [`SchemaError`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variables: BTreeSet<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub default: String,
}

impl Ruleset {
    /// Check the document structure. Conditions are not parsed here.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for an empty rule list, a missing default,
    /// a declared variable named `id`, empty rule ids or outcomes, or
    /// duplicate rule ids.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.rules.is_empty() {
            return Err(SchemaError::NoRules);
        }
        if self.default.is_empty() {
            return Err(SchemaError::MissingDefault);
        }
        if self.variables.contains(Record::ID_KEY) {
            return Err(SchemaError::ReservedVariable {
                name: Record::ID_KEY.to_owned(),
            });
        }
        let mut seen = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.id.is_empty() {
                return Err(SchemaError::EmptyRuleId { index });
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(SchemaError::DuplicateRule {
                    id: rule.id.clone(),
                });
            }
            if rule.then.is_empty() {
                return Err(SchemaError::EmptyOutcome {
                    id: rule.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse a ruleset document from JSON and validate its structure.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on malformed JSON or schema failure.
    pub fn from_json(input: &str) -> Result<Self, crate::Error> {
        let ruleset: Ruleset = serde_json::from_str(input)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Read a JSON ruleset document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on I/O, JSON, or schema failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// Compile into an [`Interpreter`] with default parse options.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on schema or compile failure.
    pub fn compile(&self) -> Result<Interpreter, crate::Error> {
        Interpreter::new(self)
    }

    /// Compile into an [`Interpreter`] with explicit parse options.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on schema or compile failure.
    pub fn compile_with(&self, options: ParseOptions) -> Result<Interpreter, crate::Error> {
        Interpreter::with_options(self, options)
    }
}

/// Builder for constructing a [`Ruleset`] in code.
///
/// # Example
///
/// ```
/// use triage::{Record, RulesetBuilder};
///
/// let interpreter = RulesetBuilder::new("cough")
///     .variables(["danger_sign", "fast_breathing"])
///     .rule("R1", |r| r.when("danger_sign").then("SEVERE"))
///     .rule("R2", |r| r.when("fast_breathing").then("PNEUMONIA"))
///     .default_outcome("NO_PNEUMONIA")
///     .compile()
///     .unwrap();
///
/// let record = Record::new()
///     .with_id("P1")
///     .set("danger_sign", false)
///     .set("fast_breathing", true);
/// assert_eq!(interpreter.evaluate(&record).unwrap().outcome(), "PNEUMONIA");
/// ```
#[derive(Debug, Default)]
pub struct RulesetBuilder {
    ruleset: Ruleset,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    when: String,
    then: String,
    evidence: Option<serde_json::Value>,
}

impl RulesetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            ruleset: Ruleset {
                name: name.to_owned(),
                ..Ruleset::default()
            },
        }
    }

    /// Declare a variable that conditions may reference.
    #[must_use]
    pub fn variable(mut self, name: &str) -> Self {
        self.ruleset.variables.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ruleset.variables.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append a rule. Rules are tested in the order they are added.
    #[must_use]
    pub fn rule(mut self, id: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder::default());
        self.ruleset.rules.push(Rule {
            id: id.to_owned(),
            when: builder.when,
            then: builder.then,
            evidence: builder.evidence,
        });
        self
    }

    #[must_use]
    pub fn default_outcome(mut self, outcome: &str) -> Self {
        self.ruleset.default = outcome.to_owned();
        self
    }

    /// Finish the document without compiling it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the document is structurally invalid.
    pub fn build(self) -> Result<Ruleset, SchemaError> {
        self.ruleset.validate()?;
        Ok(self.ruleset)
    }

    /// Build and compile into an [`Interpreter`].
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on schema or compile failure.
    pub fn compile(self) -> Result<Interpreter, crate::Error> {
        Interpreter::new(&self.ruleset)
    }

    /// Build and compile with explicit parse options.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on schema or compile failure.
    pub fn compile_with(self, options: ParseOptions) -> Result<Interpreter, crate::Error> {
        Interpreter::with_options(&self.ruleset, options)
    }
}

impl RuleBuilder {
    /// Set the condition text.
    #[must_use]
    pub fn when(mut self, condition: &str) -> Self {
        self.when = condition.to_owned();
        self
    }

    /// Set the outcome produced when the condition holds.
    #[must_use]
    pub fn then(mut self, outcome: &str) -> Self {
        self.then = outcome.to_owned();
        self
    }

    #[must_use]
    pub fn evidence(mut self, evidence: impl Into<serde_json::Value>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }
}
