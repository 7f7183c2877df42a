mod error;
mod evaluation_report;
mod expr;
mod interpreter;
mod record;
mod rule;
mod ruleset;
mod value;
mod verdict;

pub use error::{CompileError, EvalError, SchemaError};
pub use evaluation_report::{EvaluationReport, RuleCheck};
pub use expr::{literal, var, Expr};
pub use interpreter::Interpreter;
pub use record::Record;
pub(crate) use rule::CompiledRule;
pub use rule::Rule;
pub use ruleset::{RuleBuilder, Ruleset, RulesetBuilder};
pub use value::Value;
pub use verdict::Verdict;
