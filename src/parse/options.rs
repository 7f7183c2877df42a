/// How the tokenizer treats characters that cannot start any token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexMode {
    /// Unrecognized input is a [`SyntaxError::UnrecognizedInput`](super::SyntaxError).
    #[default]
    Strict,
    /// Unrecognized input is dropped and logged at `warn` level.
    Lenient,
}

/// Parser configuration shared by every rule compiled by an
/// [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub lex_mode: LexMode,
    /// Maximum nesting of `NOT` and parentheses in a single condition.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lex_mode(mut self, mode: LexMode) -> Self {
        self.lex_mode = mode;
        self
    }

    #[must_use]
    pub fn lenient(self) -> Self {
        self.lex_mode(LexMode::Lenient)
    }

    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lex_mode: LexMode::Strict,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
