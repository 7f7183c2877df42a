use thiserror::Error;

use crate::parse::{ParseError, SyntaxError};

/// Structural problems in a ruleset document, detected before any condition
/// is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("ruleset has no rules; at least one rule is required")]
    NoRules,

    #[error("ruleset has no default outcome")]
    MissingDefault,

    #[error("duplicate rule id '{id}'")]
    DuplicateRule { id: String },

    #[error("rule at position {index} has an empty id")]
    EmptyRuleId { index: usize },

    #[error("rule '{id}' has no outcome")]
    EmptyOutcome { id: String },

    #[error("variable '{name}' is reserved for the record id and cannot be declared")]
    ReservedVariable { name: String },
}

/// A rule whose condition failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown variable '{name}' in rule '{rule}' at offset {offset}")]
    UnknownVariable {
        rule: String,
        name: String,
        offset: usize,
    },

    #[error("syntax error in rule '{rule}': {source}")]
    Syntax { rule: String, source: SyntaxError },
}

impl CompileError {
    pub(crate) fn from_parse(rule: &str, err: ParseError) -> Self {
        match err {
            ParseError::UnknownVariable { name, offset } => CompileError::UnknownVariable {
                rule: rule.to_owned(),
                name,
                offset,
            },
            ParseError::Syntax(source) => CompileError::Syntax {
                rule: rule.to_owned(),
                source,
            },
        }
    }

    /// Id of the rule that failed to compile.
    #[must_use]
    pub fn rule(&self) -> &str {
        match self {
            CompileError::UnknownVariable { rule, .. } | CompileError::Syntax { rule, .. } => rule,
        }
    }
}

/// A record that cannot be evaluated. Scoped to a single evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("record '{record}' is missing field '{field}'")]
    MissingField { record: String, field: String },

    #[error("record '{record}' field '{field}' must be a bool, found {found}")]
    NotBoolean {
        record: String,
        field: String,
        found: &'static str,
    },
}
