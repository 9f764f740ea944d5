//! Path-tagged values and the two accessors every selector routes through.
use crate::context::EvalContext;
use crate::error::PathError;
use crate::expression::Evaluable;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::ops::ControlFlow;

/// A value together with the segments that lead from the root to it.
///
/// Values found in the document are borrowed from it. Values produced by a
/// script are owned, since they have no home in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PathValue<'v> {
    pub path: Vec<String>,
    pub value: Cow<'v, Value>,
}

impl<'v> PathValue<'v> {
    /// The starting point of an evaluation: the root itself, with an empty path.
    pub fn root(value: &'v Value) -> Self {
        Self {
            path: Vec::new(),
            value: Cow::Borrowed(value),
        }
    }

    pub fn owned(path: Vec<String>, value: Value) -> PathValue<'static> {
        PathValue {
            path,
            value: Cow::Owned(value),
        }
    }

    /// Derives a child entry. The child receives its own copy of the path.
    pub fn child(&self, label: String, value: Cow<'v, Value>) -> PathValue<'v> {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(label);
        PathValue { path, value }
    }

    pub fn into_owned(self) -> PathValue<'static> {
        PathValue {
            path: self.path,
            value: Cow::Owned(self.value.into_owned()),
        }
    }

    /// Renders the path as a query string, e.g. `$.store.book[0]['first name']`.
    ///
    /// An object key spelled like an array position, such as `"[0]"`, renders
    /// as that position. Use [`normalized_path_in`](Self::normalized_path_in)
    /// when the document is at hand.
    pub fn normalized_path(&self) -> String {
        render_path(&self.path, is_index_label)
    }

    /// Renders the path, walking `root` alongside it so array positions and
    /// object keys are always told apart.
    pub fn normalized_path_in(&self, root: &Value) -> String {
        let mut node = Some(root);
        render_path(&self.path, |segment| match node.take() {
            Some(Value::Object(map)) => {
                node = map.get(segment);
                false
            }
            Some(Value::Array(items)) if is_index_label(segment) => {
                node = segment[1..segment.len() - 1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i));
                true
            }
            _ => is_index_label(segment),
        })
    }
}

fn render_path(path: &[String], mut is_index: impl FnMut(&str) -> bool) -> String {
    let mut out = String::from("$");
    for segment in path {
        if is_index(segment) {
            out.push_str(segment);
        } else if is_identifier(segment) {
            out.push('.');
            out.push_str(segment);
        } else {
            out.push_str("['");
            push_escaped(&mut out, segment);
            out.push_str("']");
        }
    }
    out
}

impl fmt::Display for PathValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.normalized_path(), self.value)
    }
}

/// `[digits]`, as produced by [`index_label`]. Object keys that merely look
/// like this are quoted instead.
fn is_index_label(segment: &str) -> bool {
    segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Escapes a key for a single-quoted segment, mirroring the escapes the
/// query parser understands.
fn push_escaped(out: &mut String, key: &str) {
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// The segment label for an array access.
pub fn index_label(index: usize) -> String {
    format!("[{}]", index)
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Narrows a possibly-owned value to one of its children, keeping borrowed
/// values borrowed.
fn project<'v>(
    value: &Cow<'v, Value>,
    pick: impl FnOnce(&Value) -> Option<&Value>,
) -> Option<Cow<'v, Value>> {
    match value {
        Cow::Borrowed(v) => pick(*v).map(Cow::Borrowed),
        Cow::Owned(v) => pick(v).cloned().map(Cow::Owned),
    }
}

pub(crate) fn element<'v>(value: &Cow<'v, Value>, index: usize) -> Option<Cow<'v, Value>> {
    project(value, |v| v.as_array().and_then(|items| items.get(index)))
}

/// Resolves `key` against `current`, deciding between index and key access by
/// the shape of `current`. Returns the selected value and its segment label.
pub fn select_value<'v>(
    ctx: &EvalContext<'_>,
    key: &dyn Evaluable,
    root: &Value,
    current: &Cow<'v, Value>,
) -> Result<(Cow<'v, Value>, String), PathError> {
    let scoped = ctx.with_current(current);
    match current.as_ref() {
        Value::Array(items) => {
            let index = key
                .eval_int(&scoped, root)
                .map_err(PathError::invalid_key)?;
            let len = items.len();
            let position = usize::try_from(index)
                .ok()
                .filter(|&i| i < len)
                .ok_or(PathError::IndexOutOfBounds { index, len })?;
            let value =
                element(current, position).ok_or(PathError::IndexOutOfBounds { index, len })?;
            Ok((value, index_label(position)))
        }
        Value::Object(_) => {
            let name = key
                .eval_string(&scoped, root)
                .map_err(PathError::invalid_key)?;
            let value = project(current, |v| v.get(&name))
                .ok_or_else(|| PathError::UnknownKey(name.clone()))?;
            Ok((value, name))
        }
        other => Err(PathError::UnsupportedType {
            found: type_name(other),
        }),
    }
}

/// Walks the direct children of `pv`: array elements in index order, object
/// entries in insertion order. Scalars have no children and emit nothing.
pub fn visit_all<'v, F>(pv: &PathValue<'v>, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(String, PathValue<'v>) -> ControlFlow<()>,
{
    match &pv.value {
        Cow::Borrowed(value) => for_each_child(*value, |label, child| {
            visit(label.clone(), pv.child(label, Cow::Borrowed(child)))
        }),
        Cow::Owned(value) => for_each_child(value, |label, child| {
            visit(label.clone(), pv.child(label, Cow::Owned(child.clone())))
        }),
    }
}

fn for_each_child<'a>(
    value: &'a Value,
    mut f: impl FnMut(String, &'a Value) -> ControlFlow<()>,
) -> ControlFlow<()> {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                f(index_label(i), item)?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                f(key.clone(), item)?;
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Literal;
    use serde_json::json;

    fn select(key: Literal, value: &Value) -> Result<(Value, String), PathError> {
        let root = json!(null);
        let current = Cow::Borrowed(value);
        select_value(&EvalContext::new(), &key, &root, &current)
            .map(|(v, label)| (v.into_owned(), label))
    }

    #[test]
    fn test_select_array_index() {
        let data = json!(["a", "b", "c"]);
        assert_eq!(select(Literal::new(1), &data).unwrap(), (json!("b"), "[1]".to_string()));
        assert_eq!(
            select(Literal::new(3), &data),
            Err(PathError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            select(Literal::new(-1), &data),
            Err(PathError::IndexOutOfBounds { index: -1, len: 3 })
        );
        assert!(matches!(
            select(Literal::new("x"), &data),
            Err(PathError::InvalidKeyExpression(_))
        ));
    }

    #[test]
    fn test_select_object_key() {
        let data = json!({ "name": "ACME" });
        assert_eq!(
            select(Literal::new("name"), &data).unwrap(),
            (json!("ACME"), "name".to_string())
        );
        assert_eq!(
            select(Literal::new("missing"), &data),
            Err(PathError::UnknownKey("missing".to_string()))
        );
    }

    #[test]
    fn test_select_scalar_is_unsupported() {
        assert_eq!(
            select(Literal::new("a"), &json!(42)),
            Err(PathError::UnsupportedType { found: "number" })
        );
    }

    #[test]
    fn test_select_keeps_owned_values_owned() {
        let root = json!(null);
        let current: Cow<'_, Value> = Cow::Owned(json!({ "a": [1, 2] }));
        let (value, label) =
            select_value(&EvalContext::new(), &Literal::new("a"), &root, &current).unwrap();
        assert!(matches!(value, Cow::Owned(_)));
        assert_eq!(label, "a");
    }

    #[test]
    fn test_visit_all_children_copy_path() {
        let data = json!({ "x": [10, 20] });
        let parent = PathValue {
            path: vec!["x".to_string()],
            value: Cow::Borrowed(&data["x"]),
        };
        let mut seen = Vec::new();
        let _ = visit_all(&parent, |label, child| {
            seen.push((label, child.path));
            ControlFlow::Continue(())
        });
        assert_eq!(
            seen,
            vec![
                ("[0]".to_string(), vec!["x".to_string(), "[0]".to_string()]),
                ("[1]".to_string(), vec!["x".to_string(), "[1]".to_string()]),
            ]
        );
        assert_eq!(parent.path, vec!["x".to_string()]);
    }

    #[test]
    fn test_visit_all_object_insertion_order() {
        let data = json!({ "z": 1, "a": 2, "m": 3 });
        let mut labels = Vec::new();
        let _ = visit_all(&PathValue::root(&data), |label, _| {
            labels.push(label);
            ControlFlow::Continue(())
        });
        assert_eq!(labels, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_visit_all_scalar_and_break() {
        let scalar = json!("leaf");
        let mut count = 0;
        let _ = visit_all(&PathValue::root(&scalar), |_, _| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(count, 0);

        let data = json!([1, 2, 3]);
        let flow = visit_all(&PathValue::root(&data), |_, _| {
            count += 1;
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_normalized_path() {
        let data = json!(null);
        let pv = PathValue {
            path: vec!["store".into(), "[0]".into(), "first name".into()],
            value: Cow::Borrowed(&data),
        };
        assert_eq!(pv.normalized_path(), "$.store[0]['first name']");
    }

    #[test]
    fn test_normalized_path_escapes_quotes_and_backslashes() {
        let data = json!(null);
        let pv = PathValue {
            path: vec!["a\\b".into(), "it's".into(), "[x]".into()],
            value: Cow::Borrowed(&data),
        };
        assert_eq!(pv.normalized_path(), r"$['a\\b']['it\'s']['[x]']");
    }

    #[test]
    fn test_normalized_path_in_tells_keys_from_indices() {
        let data = json!({ "[0]": [10, 20] });
        let pv = PathValue {
            path: vec!["[0]".into(), "[1]".into()],
            value: Cow::Borrowed(&data["[0]"][1]),
        };
        assert_eq!(pv.normalized_path_in(&data), "$['[0]'][1]");
        assert_eq!(pv.normalized_path(), "$[0][1]");
    }
}
