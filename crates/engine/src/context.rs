//! The scoped binding of the "current element" (`@`) used by filters and scripts.
use crate::error::PathError;
use crate::value::PathValue;
use serde_json::Value;

/// Ceilings a caller may impose on a single evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Deepest level recursive descent will enter, relative to the node it starts from.
    pub max_descent_depth: Option<usize>,
}

/// Immutable evaluation state passed down every selector call.
///
/// Binding a new current element never touches `self`; it yields a fresh
/// context layered on top, so the binding disappears when the callee returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext<'c> {
    current: Option<&'c Value>,
    current_path: &'c [String],
    limits: Limits,
}

impl<'c> EvalContext<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            current: None,
            current_path: &[],
            limits,
        }
    }

    /// Returns a child context whose current element is `value`, reached by
    /// an empty path.
    pub fn with_current<'n>(&self, value: &'n Value) -> EvalContext<'n>
    where
        'c: 'n,
    {
        EvalContext {
            current: Some(value),
            current_path: &[],
            limits: self.limits,
        }
    }

    /// Binds `pv` as the current element, keeping the path that reached it so
    /// `@` resolves to the same location in the document.
    pub fn with_current_path<'n>(&self, pv: &'n PathValue<'_>) -> EvalContext<'n>
    where
        'c: 'n,
    {
        EvalContext {
            current: Some(pv.value.as_ref()),
            current_path: &pv.path,
            limits: self.limits,
        }
    }

    pub fn current(&self) -> Result<&'c Value, PathError> {
        self.current.ok_or(PathError::NoCurrentElement)
    }

    /// Segments leading from the root to the current element.
    pub fn current_path(&self) -> &'c [String] {
        self.current_path
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }
}
