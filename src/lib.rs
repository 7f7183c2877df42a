mod compile;
pub mod diagram;
mod error;
mod evaluate;
pub mod extract;
pub mod parse;
mod types;

pub use error::Error;
pub(crate) use types::CompiledRule;
pub use types::{
    literal, var, CompileError, EvalError, EvaluationReport, Expr, Interpreter, Record, Rule,
    RuleBuilder, RuleCheck, Ruleset, RulesetBuilder, SchemaError, Value, Verdict,
};
