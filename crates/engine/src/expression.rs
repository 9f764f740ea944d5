//! The "evaluable expression" capability consumed by keys, filters, ranges and scripts.
//!
//! The engine never parses expression text. Anything that can turn the current
//! context into a value implements [`Evaluable`]; the typed accessors coerce
//! that value the way selectors need it.
use crate::context::EvalContext;
use crate::error::PathError;
use crate::value::{PathValue, type_name};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// The result of evaluating an expression: either a plain value, or a value
/// that already knows the path it was found at.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue<'v> {
    Value(Cow<'v, Value>),
    Path(PathValue<'v>),
}

impl<'v> ExprValue<'v> {
    pub fn owned(value: Value) -> Self {
        ExprValue::Value(Cow::Owned(value))
    }

    pub fn value(&self) -> &Value {
        match self {
            ExprValue::Value(v) => v,
            ExprValue::Path(pv) => &pv.value,
        }
    }

    pub fn into_value(self) -> Cow<'v, Value> {
        match self {
            ExprValue::Value(v) => v,
            ExprValue::Path(pv) => pv.value,
        }
    }

    /// Truthiness used by filters and the logical operators.
    pub fn is_truthy(&self) -> Result<bool, PathError> {
        match self.value() {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
            Value::String(s) => Ok(!s.is_empty()),
            Value::Array(items) => Ok(!items.is_empty()),
            Value::Object(map) => Ok(!map.is_empty()),
        }
    }
}

/// An expression that can be evaluated against a root document and the
/// current element bound in `ctx`.
pub trait Evaluable: fmt::Debug + Send + Sync {
    fn eval<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
    ) -> Result<ExprValue<'v>, PathError>;

    fn eval_int(&self, ctx: &EvalContext<'_>, root: &Value) -> Result<i64, PathError> {
        let result = self.eval(ctx, root)?;
        match result.value() {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| PathError::evaluation(format!("{} is not an integer", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| PathError::evaluation(format!("'{}' is not an integer", s))),
            other => Err(PathError::evaluation(format!(
                "expected integer, found {}",
                type_name(other)
            ))),
        }
    }

    fn eval_string(&self, ctx: &EvalContext<'_>, root: &Value) -> Result<String, PathError> {
        let result = self.eval(ctx, root)?;
        match result.into_value().into_owned() {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(PathError::evaluation(format!(
                "expected string, found {}",
                type_name(&other)
            ))),
        }
    }

    fn eval_bool(&self, ctx: &EvalContext<'_>, root: &Value) -> Result<bool, PathError> {
        self.eval(ctx, root)?.is_truthy()
    }
}

/// A constant expression, used for plain keys and indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub Value);

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }
}

impl Evaluable for Literal {
    fn eval<'v>(
        &self,
        _ctx: &EvalContext<'v>,
        _root: &'v Value,
    ) -> Result<ExprValue<'v>, PathError> {
        Ok(ExprValue::owned(self.0.clone()))
    }
}
