use std::collections::BTreeSet;

use crate::Expr;

use super::error::{ParseError, SyntaxError};
use super::lexer::{tokenize, Token, TokenKind};
use super::options::ParseOptions;

/// Recursive-descent parser for rule conditions.
///
/// Precedence, lowest to highest: `OR`, `AND`, `NOT`, then primaries
/// (parenthesized expressions, `true`/`false`, identifiers). Identifiers are
/// checked against the declared variable set while parsing.
#[derive(Debug, Clone)]
pub struct Parser {
    variables: BTreeSet<String>,
    options: ParseOptions,
}

/// Position in the token stream. Each grammar step takes a cursor by value
/// and hands back the advanced one alongside what it parsed.
#[derive(Debug, Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(self) -> Self {
        Self {
            pos: self.pos + 1,
            ..self
        }
    }

    /// Advance past `kind` if it is the next token.
    fn eat(self, kind: &TokenKind) -> Option<Self> {
        match self.peek() {
            Some(token) if token.kind == *kind => Some(self.advance()),
            _ => None,
        }
    }
}

type Step<'t> = Result<(Expr, Cursor<'t>), ParseError>;

impl Parser {
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            options: ParseOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    #[must_use]
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Parse a condition string into an [`Expr`].
    ///
    /// The whole input must form exactly one expression.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownVariable`] for identifiers outside the
    /// declared set, and [`ParseError::Syntax`] for malformed input.
    pub fn parse(&self, condition: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(condition, self.options.lex_mode)?;
        if tokens.is_empty() {
            return Err(SyntaxError::EmptyExpression.into());
        }

        let (expr, rest) = self.or_expr(Cursor::new(&tokens), 0)?;
        if let Some(token) = rest.peek() {
            return Err(SyntaxError::TrailingToken {
                found: token.kind.to_string(),
                offset: token.offset,
            }
            .into());
        }
        Ok(expr)
    }

    // Or := And (OR And)*
    fn or_expr<'t>(&self, cur: Cursor<'t>, depth: usize) -> Step<'t> {
        let (mut left, mut cur) = self.and_expr(cur, depth)?;
        while let Some(next) = cur.eat(&TokenKind::Or) {
            let (right, after) = self.and_expr(next, depth)?;
            left = left.or(right);
            cur = after;
        }
        Ok((left, cur))
    }

    // And := Not (AND Not)*
    fn and_expr<'t>(&self, cur: Cursor<'t>, depth: usize) -> Step<'t> {
        let (mut left, mut cur) = self.not_expr(cur, depth)?;
        while let Some(next) = cur.eat(&TokenKind::And) {
            let (right, after) = self.not_expr(next, depth)?;
            left = left.and(right);
            cur = after;
        }
        Ok((left, cur))
    }

    // Not := NOT Not | Primary
    fn not_expr<'t>(&self, cur: Cursor<'t>, depth: usize) -> Step<'t> {
        match cur.peek() {
            Some(token) if token.kind == TokenKind::Not => {
                let depth = self.descend(token, depth)?;
                let (inner, cur) = self.not_expr(cur.advance(), depth)?;
                Ok((!inner, cur))
            }
            _ => self.primary(cur, depth),
        }
    }

    // Primary := '(' Or ')' | 'true' | 'false' | Identifier
    fn primary<'t>(&self, cur: Cursor<'t>, depth: usize) -> Step<'t> {
        let Some(token) = cur.peek() else {
            return Err(SyntaxError::UnexpectedEnd {
                expected: "operand",
            }
            .into());
        };

        match &token.kind {
            TokenKind::LParen => {
                let depth = self.descend(token, depth)?;
                let (inner, after) = self.or_expr(cur.advance(), depth)?;
                match after.peek() {
                    Some(close) if close.kind == TokenKind::RParen => Ok((inner, after.advance())),
                    Some(other) => Err(SyntaxError::UnexpectedToken {
                        found: other.kind.to_string(),
                        offset: other.offset,
                        expected: "')'",
                    }
                    .into()),
                    None => Err(SyntaxError::UnclosedParen {
                        offset: token.offset,
                    }
                    .into()),
                }
            }
            TokenKind::True => Ok((Expr::Literal(true), cur.advance())),
            TokenKind::False => Ok((Expr::Literal(false), cur.advance())),
            TokenKind::Ident(name) => {
                if !self.variables.contains(name) {
                    return Err(ParseError::UnknownVariable {
                        name: name.clone(),
                        offset: token.offset,
                    });
                }
                Ok((Expr::Variable(name.clone()), cur.advance()))
            }
            TokenKind::RParen | TokenKind::And | TokenKind::Or | TokenKind::Not => {
                Err(SyntaxError::UnexpectedToken {
                    found: token.kind.to_string(),
                    offset: token.offset,
                    expected: "operand",
                }
                .into())
            }
        }
    }

    fn descend(&self, token: &Token, depth: usize) -> Result<usize, ParseError> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                offset: token.offset,
                limit: self.options.max_depth,
            }
            .into());
        }
        Ok(depth)
    }
}
