use thiserror::Error;

/// Failures raised while evaluating selectors and expressions.
///
/// Inside a deterministic chain any of these aborts the chain. Inside an
/// ambiguous step they only remove the branch that raised them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Unsupported value type {found} for select, expected object or array")]
    UnsupportedType { found: &'static str },

    #[error("Could not select value, invalid key: {0}")]
    InvalidKeyExpression(String),

    #[error("Script returned {found} instead of a path value pair")]
    InvalidScriptResult { found: &'static str },

    #[error("No current element is bound")]
    NoCurrentElement,

    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl PathError {
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation(message.into())
    }

    /// Wraps a key evaluation failure. Failures that already are invalid keys
    /// pass through unchanged.
    pub fn invalid_key(cause: PathError) -> Self {
        match cause {
            Self::InvalidKeyExpression(_) => cause,
            other => Self::InvalidKeyExpression(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_is_not_wrapped_twice() {
        let once = PathError::invalid_key(PathError::evaluation("bad"));
        assert_eq!(once, PathError::InvalidKeyExpression("Evaluation error: bad".into()));
        assert_eq!(PathError::invalid_key(once.clone()), once);
    }
}
