use std::fmt;
use std::ops::Not;

use super::error::EvalError;
use super::Record;

/// Boolean condition AST produced by the [`Parser`](crate::parse::Parser).
///
/// Each node exclusively owns its children; trees are never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(bool),
    Variable(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate against a record.
    ///
    /// Both operands of `AND`/`OR` are always evaluated, so a missing or
    /// mistyped field is reported no matter where it sits in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if a referenced variable is absent from the
    /// record or is not a boolean.
    pub fn evaluate(&self, record: &Record) -> Result<bool, EvalError> {
        match self {
            Expr::Literal(v) => Ok(*v),
            Expr::Variable(name) => record.get_bool(name),
            Expr::Not(inner) => Ok(!inner.evaluate(record)?),
            Expr::And(a, b) => {
                let left = a.evaluate(record)?;
                let right = b.evaluate(record)?;
                Ok(left && right)
            }
            Expr::Or(a, b) => {
                let left = a.evaluate(record)?;
                let right = b.evaluate(record)?;
                Ok(left || right)
            }
        }
    }

    /// Variable names referenced by this expression, in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_variables(self, &mut out);
        out
    }
}

fn collect_variables<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::Variable(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Expr::And(a, b) | Expr::Or(a, b) => {
            collect_variables(a, out);
            collect_variables(b, out);
        }
        Expr::Not(inner) => collect_variables(inner, out),
        Expr::Literal(_) => {}
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Not(inner) => write!(f, "(NOT {inner})"),
            Expr::And(a, b) => write!(f, "({a} AND {b})"),
            Expr::Or(a, b) => write!(f, "({a} OR {b})"),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

#[must_use]
pub fn var(name: &str) -> Expr {
    Expr::Variable(name.to_owned())
}

#[must_use]
pub fn literal(value: bool) -> Expr {
    Expr::Literal(value)
}
