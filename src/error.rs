use thiserror::Error as ThisError;

use crate::extract::ExtractError;
use crate::{CompileError, EvalError, SchemaError};

/// Unified error type covering loading, compilation, evaluation, and I/O.
///
/// Returned by convenience methods like [`Ruleset::from_json()`](crate::Ruleset::from_json)
/// and [`Interpreter::new()`](crate::Interpreter::new). Each variant wraps the
/// specific error so callers can match on the kind.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Evaluate(#[from] EvalError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
