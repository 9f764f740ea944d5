//! Evaluation of parsed expressions against the current element and root.
use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use pathwalk_engine::{EvalContext, Evaluable, Evaluated, ExprValue, PathError, type_name};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::cmp::Ordering;

impl Evaluable for Expression {
    fn eval<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
    ) -> Result<ExprValue<'v>, PathError> {
        match self {
            Expression::Literal(value) => Ok(ExprValue::owned(value.clone())),
            Expression::Path(path) => match path.evaluate(ctx, root)? {
                Evaluated::Single(pv) => Ok(ExprValue::Path(pv)),
                Evaluated::Many(matches) => Ok(ExprValue::owned(Value::Array(
                    matches
                        .into_iter()
                        .map(|pv| pv.value.into_owned())
                        .collect(),
                ))),
            },
            Expression::UnaryOp { op, expr } => {
                let operand = expr.eval(ctx, root)?;
                match op {
                    UnaryOperator::Not => Ok(ExprValue::owned(Value::Bool(!operand.is_truthy()?))),
                    UnaryOperator::Minus => {
                        let n = to_number(operand.value())?;
                        Ok(ExprValue::owned(number_value(-n)))
                    }
                }
            }
            Expression::BinaryOp { left, op, right } => match op {
                // Logical operators short-circuit.
                BinaryOperator::And => {
                    let result = left.eval_bool(ctx, root)? && right.eval_bool(ctx, root)?;
                    Ok(ExprValue::owned(Value::Bool(result)))
                }
                BinaryOperator::Or => {
                    let result = left.eval_bool(ctx, root)? || right.eval_bool(ctx, root)?;
                    Ok(ExprValue::owned(Value::Bool(result)))
                }
                _ => {
                    let left = left.eval(ctx, root)?;
                    let right = right.eval(ctx, root)?;
                    evaluate_binary(*op, left.value(), right.value()).map(ExprValue::owned)
                }
            },
            Expression::Matches { expr, pattern } => {
                let subject = expr.eval(ctx, root)?;
                match subject.value() {
                    Value::String(s) => Ok(ExprValue::owned(Value::Bool(pattern.is_match(s)))),
                    other => Err(PathError::evaluation(format!(
                        "cannot match {} against /{}/",
                        type_name(other),
                        pattern.as_str()
                    ))),
                }
            }
        }
    }
}

fn evaluate_binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, PathError> {
    match op {
        BinaryOperator::Equals => Ok(Value::Bool(loose_equals(left, right))),
        BinaryOperator::NotEquals => Ok(Value::Bool(!loose_equals(left, right))),
        BinaryOperator::LessThan => compare(left, right).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOperator::LessThanOrEqual => {
            compare(left, right).map(|o| Value::Bool(o != Ordering::Greater))
        }
        BinaryOperator::GreaterThan => {
            compare(left, right).map(|o| Value::Bool(o == Ordering::Greater))
        }
        BinaryOperator::GreaterThanOrEqual => {
            compare(left, right).map(|o| Value::Bool(o != Ordering::Less))
        }
        BinaryOperator::Plus => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", render(left), render(right))))
            }
            _ => Ok(number_value(to_number(left)? + to_number(right)?)),
        },
        BinaryOperator::Minus => Ok(number_value(to_number(left)? - to_number(right)?)),
        BinaryOperator::Multiply => Ok(number_value(to_number(left)? * to_number(right)?)),
        BinaryOperator::Divide => {
            let divisor = to_number(right)?;
            if divisor == 0.0 {
                return Err(PathError::evaluation("division by zero"));
            }
            Ok(number_value(to_number(left)? / divisor))
        }
        BinaryOperator::Modulo => {
            let divisor = to_number(right)?;
            if divisor == 0.0 {
                return Err(PathError::evaluation("division by zero"));
            }
            Ok(number_value(to_number(left)? % divisor))
        }
        BinaryOperator::And => Ok(Value::Bool(truthy(left)? && truthy(right)?)),
        BinaryOperator::Or => Ok(Value::Bool(truthy(left)? || truthy(right)?)),
    }
}

/// JSON equality, except that numbers compare by value (`1 == 1.0`).
fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value) -> Result<Ordering, PathError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b))
            .ok_or_else(|| PathError::evaluation("numbers are not comparable")),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => Err(PathError::evaluation(format!(
            "cannot compare {} with {}",
            type_name(left),
            type_name(right)
        ))),
    }
}

fn to_number(value: &Value) -> Result<f64, PathError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PathError::evaluation(format!("{} is out of range", n))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| PathError::evaluation(format!("'{}' is not a number", s))),
        other => Err(PathError::evaluation(format!(
            "expected number, found {}",
            type_name(other)
        ))),
    }
}

/// Integral results stay integers so they can be used as array indices.
fn number_value(n: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn truthy(value: &Value) -> Result<bool, PathError> {
    ExprValue::Value(Cow::Borrowed(value)).is_truthy()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
