//! The atomic path steps.
//!
//! A [`PlainSelector`] turns one path value into exactly one, or fails. An
//! [`AmbiguousSelector`] turns one path value into any number of branches,
//! handing each to a matcher callback instead of returning it.
use crate::context::EvalContext;
use crate::error::PathError;
use crate::expression::{Evaluable, ExprValue, Literal};
use crate::value::{PathValue, element, index_label, select_value, type_name, visit_all};
use serde_json::Value;
use std::borrow::Cow;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Identifies which iteration of an ambiguous step produced a match,
/// independently of the textual path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BranchKey {
    /// The child label picked by a wildcard, key list, filter or slice.
    Label(String),
    /// The labels walked below the starting node by recursive descent; empty
    /// for the starting node itself.
    Descent(Vec<String>),
}

/// Callback receiving each branch of an ambiguous step.
pub type BranchMatcher<'m, 'v> = dyn FnMut(BranchKey, PathValue<'v>) -> ControlFlow<()> + 'm;

/// A step that yields exactly one result or fails.
#[derive(Debug, Clone)]
pub enum PlainSelector {
    /// `@`: the element currently under test.
    Current,
    /// `.x` or `[x]`: index or key access, chosen by the shape of the input.
    Direct(Arc<dyn Evaluable>),
    /// `(...)`: an expression that must itself evaluate to a path value pair.
    ///
    /// The result replaces the input entirely, path included. `@` inside the
    /// script is bound to the input together with its path, so `.(@.c)`
    /// reports the same path as `.c`. Expressions producing plain values fail
    /// with [`PathError::InvalidScriptResult`].
    Script(Arc<dyn Evaluable>),
}

impl PlainSelector {
    pub fn direct(key: impl Evaluable + 'static) -> Self {
        PlainSelector::Direct(Arc::new(key))
    }

    pub fn key(name: impl Into<String>) -> Self {
        Self::direct(Literal(Value::String(name.into())))
    }

    pub fn index(index: i64) -> Self {
        Self::direct(Literal::new(index))
    }

    pub fn script(expr: impl Evaluable + 'static) -> Self {
        PlainSelector::Script(Arc::new(expr))
    }

    pub fn apply<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
        input: PathValue<'v>,
    ) -> Result<PathValue<'v>, PathError> {
        match self {
            PlainSelector::Current => Ok(PathValue {
                path: ctx.current_path().to_vec(),
                value: Cow::Borrowed(ctx.current()?),
            }),
            PlainSelector::Direct(key) => {
                let (value, label) = select_value(ctx, key.as_ref(), root, &input.value)?;
                Ok(input.child(label, value))
            }
            PlainSelector::Script(script) => {
                let scoped = ctx.with_current_path(&input);
                match script.eval(&scoped, root)? {
                    ExprValue::Path(pv) => Ok(pv.into_owned()),
                    ExprValue::Value(value) => Err(PathError::InvalidScriptResult {
                        found: type_name(&value),
                    }),
                }
            }
        }
    }
}

/// Applies `selectors` left to right, stopping at the first failure.
pub(crate) fn apply_chain<'v>(
    selectors: &[PlainSelector],
    ctx: &EvalContext<'v>,
    root: &'v Value,
    input: PathValue<'v>,
) -> Result<PathValue<'v>, PathError> {
    selectors
        .iter()
        .try_fold(input, |pv, selector| selector.apply(ctx, root, pv))
}

/// A step that may yield zero, one or many results.
///
/// Failures while resolving one candidate only drop that candidate.
#[derive(Debug, Clone)]
pub enum AmbiguousSelector {
    /// `*` or `[*]`: every direct child.
    Star,
    /// `[a,b,...]`: the listed keys, in listed order.
    Multi(Vec<Arc<dyn Evaluable>>),
    /// `..`: the node itself followed by all of its descendants.
    RecursiveDescent,
    /// `[?(...)]`: the children for which the predicate holds.
    Filter(Arc<dyn Evaluable>),
    /// `[min:max:step]`: a slice of an array.
    Range {
        min: Arc<dyn Evaluable>,
        max: Arc<dyn Evaluable>,
        step: Arc<dyn Evaluable>,
    },
}

impl AmbiguousSelector {
    /// A key list. An empty list selects every child, like `*`.
    pub fn multi(keys: Vec<Arc<dyn Evaluable>>) -> Self {
        if keys.is_empty() {
            AmbiguousSelector::Star
        } else {
            AmbiguousSelector::Multi(keys)
        }
    }

    pub fn keys<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::multi(
            names
                .into_iter()
                .map(|name| Arc::new(Literal(Value::String(name.into()))) as Arc<dyn Evaluable>)
                .collect(),
        )
    }

    pub fn filter(predicate: impl Evaluable + 'static) -> Self {
        AmbiguousSelector::Filter(Arc::new(predicate))
    }

    pub fn range(
        min: impl Evaluable + 'static,
        max: impl Evaluable + 'static,
        step: impl Evaluable + 'static,
    ) -> Self {
        AmbiguousSelector::Range {
            min: Arc::new(min),
            max: Arc::new(max),
            step: Arc::new(step),
        }
    }

    pub fn slice(min: i64, max: i64, step: i64) -> Self {
        Self::range(Literal::new(min), Literal::new(max), Literal::new(step))
    }

    /// Feeds every branch produced from `input` to `matched`. Returns
    /// `Break` as soon as the matcher asks to stop.
    pub fn select<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
        input: PathValue<'v>,
        matched: &mut BranchMatcher<'_, 'v>,
    ) -> ControlFlow<()> {
        match self {
            AmbiguousSelector::Star => {
                visit_all(&input, |label, child| matched(BranchKey::Label(label), child))
            }
            AmbiguousSelector::Multi(keys) => {
                for key in keys {
                    match select_value(ctx, key.as_ref(), root, &input.value) {
                        Ok((value, label)) => {
                            let child = input.child(label.clone(), value);
                            matched(BranchKey::Label(label), child)?;
                        }
                        Err(err) => log::trace!("Skipping key {:?}: {}", key, err),
                    }
                }
                ControlFlow::Continue(())
            }
            AmbiguousSelector::RecursiveDescent => {
                let mut prefix = Vec::new();
                descend(ctx, input, 0, &mut prefix, matched)
            }
            AmbiguousSelector::Filter(predicate) => visit_all(&input, |label, child| {
                let keep = {
                    let scoped = ctx.with_current_path(&child);
                    predicate.eval_bool(&scoped, root)
                };
                match keep {
                    Ok(true) => matched(BranchKey::Label(label), child),
                    Ok(false) => ControlFlow::Continue(()),
                    Err(err) => {
                        log::trace!("Filter skipped {}: {}", child.normalized_path(), err);
                        ControlFlow::Continue(())
                    }
                }
            }),
            AmbiguousSelector::Range { min, max, step } => {
                let Value::Array(items) = input.value.as_ref() else {
                    return ControlFlow::Continue(());
                };
                let len = items.len();
                let bounds = {
                    let scoped = ctx.with_current_path(&input);
                    eval_bounds(&scoped, root, min.as_ref(), max.as_ref(), step.as_ref())
                };
                let (min, max, step) = match bounds {
                    Ok(bounds) => bounds,
                    Err(err) => {
                        log::trace!("Range skipped {}: {}", input.normalized_path(), err);
                        return ControlFlow::Continue(());
                    }
                };
                for index in slice_indices(min, max, step, len) {
                    if let Some(value) = element(&input.value, index) {
                        let child = input.child(index_label(index), value);
                        matched(BranchKey::Label(index.to_string()), child)?;
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }
}

fn eval_bounds(
    ctx: &EvalContext<'_>,
    root: &Value,
    min: &dyn Evaluable,
    max: &dyn Evaluable,
    step: &dyn Evaluable,
) -> Result<(i64, i64, i64), PathError> {
    Ok((
        min.eval_int(ctx, root)?,
        max.eval_int(ctx, root)?,
        step.eval_int(ctx, root)?,
    ))
}

fn descend<'v>(
    ctx: &EvalContext<'v>,
    node: PathValue<'v>,
    depth: usize,
    prefix: &mut Vec<String>,
    matched: &mut BranchMatcher<'_, 'v>,
) -> ControlFlow<()> {
    matched(BranchKey::Descent(prefix.clone()), node.clone())?;
    if ctx
        .limits()
        .max_descent_depth
        .is_some_and(|max| depth >= max)
    {
        log::debug!(
            "Recursive descent stopped at depth {} below {}",
            depth,
            node.normalized_path()
        );
        return ControlFlow::Continue(());
    }
    visit_all(&node, |label, child| {
        prefix.push(label);
        let flow = descend(ctx, child, depth + 1, prefix, matched);
        prefix.pop();
        flow
    })
}

/// Python-style bound normalisation: negative values count from the end and
/// are clamped to zero, values past the end are clamped to `len`.
fn clamp_index(index: i64, len: i64) -> i64 {
    if index < 0 {
        (len + index).max(0)
    } else {
        index.min(len)
    }
}

/// The array positions visited by a slice, in visiting order.
fn slice_indices(min: i64, max: i64, step: i64, len: usize) -> Vec<usize> {
    let n = i64::try_from(len).unwrap_or(i64::MAX);
    let step = if step == 0 { 1 } else { step };
    let lo = clamp_index(min, n);
    let hi = clamp_index(max, n);
    let mut indices = Vec::new();

    if step > 0 {
        if min > max {
            return indices;
        }
        let mut i = lo;
        while i < hi {
            indices.push(i as usize);
            i = i.saturating_add(step);
        }
    } else if min <= max {
        let mut i = hi - 1;
        while i >= lo {
            indices.push(i as usize);
            i = i.saturating_add(step);
        }
    } else {
        // Bounds given high to low, e.g. `[4:1:-1]`.
        let mut i = lo.min(n - 1);
        while i > hi {
            indices.push(i as usize);
            i = i.saturating_add(step);
        }
    }
    indices
}
