use std::fmt;

use tracing::warn;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::combinator::alt;
use winnow::stream::Offset;
use winnow::token::{take_till, take_while};

use super::error::SyntaxError;
use super::options::LexMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    And,
    Or,
    Not,
    True,
    False,
    LParen,
    RParen,
    Ident(String),
}

/// A lexical token and the byte offset where it starts in the condition text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl TokenKind {
    /// Keywords are case-sensitive: operators are uppercase, literals lowercase.
    /// Anything else shaped like a word is an identifier.
    fn from_word(word: &str) -> Self {
        match word {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            other => TokenKind::Ident(other.to_owned()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Ident(name) => write!(f, "{name}"),
        }
    }
}

// -- Lexemes ----------------------------------------------------------------

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn ws<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., |c: char| c.is_whitespace()).parse_next(input)
}

/// A maximal word, so keywords embedded in identifiers (`ANDROID`, `nota`)
/// never split.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (take_while(1.., is_word_start), take_while(0.., is_word_char))
        .take()
        .parse_next(input)
}

fn token_kind(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        '('.value(TokenKind::LParen),
        ')'.value(TokenKind::RParen),
        word.map(TokenKind::from_word),
    ))
    .parse_next(input)
}

/// A run of characters that cannot start any token.
fn unrecognized<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(1.., |c: char| {
        c.is_whitespace() || c == '(' || c == ')' || is_word_start(c)
    })
    .parse_next(input)
}

// -- Tokenizer --------------------------------------------------------------

/// Split a condition into tokens. No knowledge of declared variables.
pub(crate) fn tokenize(source: &str, mode: LexMode) -> Result<Vec<Token>, SyntaxError> {
    let mut input = source;
    let mut tokens = Vec::new();

    loop {
        // zero-or-more whitespace cannot fail on complete input
        let _ = ws.parse_next(&mut input);
        if input.is_empty() {
            return Ok(tokens);
        }

        let offset = input.offset_from(&source);
        let mut attempt = input;
        if let Ok(kind) = token_kind.parse_next(&mut attempt) {
            input = attempt;
            tokens.push(Token { kind, offset });
            continue;
        }

        let text = unrecognized
            .parse_next(&mut input)
            .map_err(|_| SyntaxError::UnrecognizedInput {
                text: input.chars().take(1).collect(),
                offset,
            })?;
        match mode {
            LexMode::Strict => {
                return Err(SyntaxError::UnrecognizedInput {
                    text: text.to_owned(),
                    offset,
                });
            }
            LexMode::Lenient => {
                warn!(text, offset, condition = source, "dropping unrecognized input");
            }
        }
    }
}
