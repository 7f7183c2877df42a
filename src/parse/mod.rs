mod error;
mod lexer;
mod options;
mod parser;

pub use error::{ParseError, SyntaxError};
pub use options::{LexMode, ParseOptions};
pub use parser::Parser;

/// Parse a single condition against a declared variable set with default options.
///
/// # Errors
///
/// Returns [`ParseError`] if the condition is malformed or references an
/// undeclared variable.
pub fn parse<I, S>(condition: &str, variables: I) -> Result<crate::Expr, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Parser::new(variables).parse(condition)
}
