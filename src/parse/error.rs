use thiserror::Error;

/// Structural or lexical problems in a single condition string.
///
/// Offsets are byte offsets into the condition text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("unrecognized input '{text}' at offset {offset}")]
    UnrecognizedInput { text: String, offset: usize },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("unclosed '(' at offset {offset}")]
    UnclosedParen { offset: usize },

    #[error("unexpected trailing '{found}' at offset {offset} after complete expression")]
    TrailingToken { found: String, offset: usize },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },
}

/// Errors produced when parsing a condition string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown variable '{name}' at offset {offset}: not declared in the ruleset variables")]
    UnknownVariable { name: String, offset: usize },

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}
