//! Expression AST types.

use core::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::duration::format_duration;
use crate::quote::quote_string;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal (64-bit float).
    Number(f64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Boolean(bool),
    /// Absolute instant, UTC.
    Time(DateTime<Utc>),
    /// Duration literal.
    Duration(Duration),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the surface spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the precedence of the operator (higher binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div => 5,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name, casing preserved.
    pub name: String,
    /// The arguments, in order.
    pub args: Vec<Expr>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A reference to a field or tag by name. Quoted names keep their
    /// surrounding double quotes.
    VarRef {
        /// The referenced name.
        name: String,
    },

    /// The `*` wildcard.
    Wildcard,

    /// A function call.
    Call(FunctionCall),

    /// A binary expression.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },

    /// A parenthesized expression, preserved so rendering keeps the
    /// original grouping.
    Paren(Box<Expr>),
}

impl Expr {
    /// Creates a number literal.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Str(value.into()))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a duration literal.
    #[must_use]
    pub const fn duration(value: Duration) -> Self {
        Self::Literal(Literal::Duration(value))
    }

    /// Creates a variable reference.
    #[must_use]
    pub fn var_ref(name: impl Into<String>) -> Self {
        Self::VarRef { name: name.into() }
    }

    /// Creates a function call.
    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(FunctionCall {
            name: name.into(),
            args,
        })
    }

    /// Creates a binary expression with `self` as the left operand.
    #[must_use]
    pub fn binary(self, op: BinaryOp, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    /// Creates an equality comparison.
    #[must_use]
    pub fn eq(self, rhs: Self) -> Self {
        self.binary(BinaryOp::Eq, rhs)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        self.binary(BinaryOp::And, rhs)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        self.binary(BinaryOp::Or, rhs)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(&quote_string(s)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Time(t) => write!(f, "'{}'", t.format("%Y-%m-%d %H:%M:%S%.f")),
            Self::Duration(d) => f.write_str(&format_duration(*d)),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::VarRef { name } => f.write_str(name),
            Self::Wildcard => f.write_str("*"),
            Self::Call(call) => write!(f, "{call}"),
            Self::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Self::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Eq.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_expr_builders() {
        let expr = Expr::var_ref("host").eq(Expr::string("server01"));
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Expr::number(100.0).to_string(), "100");
        assert_eq!(Expr::number(10.5).to_string(), "10.5");
        assert_eq!(Expr::boolean(true).to_string(), "true");
        assert_eq!(Expr::string("foo").to_string(), "'foo'");
        assert_eq!(
            Expr::duration(Duration::from_secs(36_000)).to_string(),
            "10h"
        );
    }

    #[test]
    fn test_display_nested() {
        let expr = Expr::Paren(Box::new(
            Expr::number(1.0).binary(BinaryOp::Add, Expr::number(2.0)),
        ))
        .binary(BinaryOp::Mul, Expr::number(3.0));
        assert_eq!(expr.to_string(), "(1 + 2) * 3");
    }

    #[test]
    fn test_display_call() {
        let expr = Expr::call("time", vec![Expr::duration(Duration::from_secs(300))]);
        assert_eq!(expr.to_string(), "time(5m)");
        assert_eq!(Expr::call("count", vec![]).to_string(), "count()");
    }
}
