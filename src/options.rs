use crate::error::Error;
use pathwalk_engine::Limits;
use serde::{Deserialize, Serialize};

/// Ceilings applied while evaluating a [`Query`](crate::Query).
///
/// Recursive descent has no bound of its own, so callers evaluating
/// untrusted documents should set both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOptions {
    /// Stop after this many matches.
    pub max_results: Option<usize>,
    /// Do not descend more than this many levels below the node `..` starts from.
    pub max_descent_depth: Option<usize>,
}

impl QueryOptions {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_max_descent_depth(mut self, depth: usize) -> Self {
        self.max_descent_depth = Some(depth);
        self
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_descent_depth: self.max_descent_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let options = QueryOptions::from_json(r#"{ "maxResults": 5 }"#).unwrap();
        assert_eq!(options.max_results, Some(5));
        assert_eq!(options.max_descent_depth, None);
        assert_eq!(QueryOptions::from_json("{}").unwrap(), QueryOptions::default());
    }

    #[test]
    fn test_builder_methods() {
        let options = QueryOptions::default()
            .with_max_results(2)
            .with_max_descent_depth(4);
        assert_eq!(options.limits().max_descent_depth, Some(4));
        assert_eq!(options.max_results, Some(2));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            QueryOptions::from_json("{ maxResults: }"),
            Err(Error::Json(_))
        ));
    }
}
