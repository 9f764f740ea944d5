//! Defines the expression tree used by filters, computed keys and scripts.
use pathwalk_engine::Path;
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Expression {
    /// A number, string, boolean or null.
    Literal(Value),
    /// An embedded query, rooted at `@` or `$`.
    Path(Path),
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// `expr =~ 'pattern'`. The pattern is compiled with the query.
    Matches {
        expr: Box<Expression>,
        pattern: Regex,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}
