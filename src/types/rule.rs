use serde::{Deserialize, Serialize};

use super::expr::Expr;

/// One entry of a [`Ruleset`](super::Ruleset): when `when` holds, the outcome
/// is `then`.
///
/// Rules are created via [`RulesetBuilder`](super::RulesetBuilder) or loaded
/// from a ruleset document. `evidence` is an opaque reference carried through
/// to the [`Verdict`](super::Verdict) when the rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub when: String,
    pub then: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<serde_json::Value>,
}

/// A rule whose condition has been parsed into an [`Expr`].
///
/// Produced by the compilation step and stored inside an
/// [`Interpreter`](super::Interpreter). The original condition text is kept
/// for justifications.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) id: String,
    pub(crate) when: String,
    pub(crate) then: String,
    pub(crate) expression: Expr,
    pub(crate) evidence: Option<serde_json::Value>,
}
