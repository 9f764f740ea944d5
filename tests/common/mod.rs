pub mod fixtures;

use pathwalk::{Evaluated, Query};
use serde_json::Value;

/// Compiles `query` and renders every match as `(normalized path, value)`.
pub fn matches(query: &str, data: &Value) -> Vec<(String, Value)> {
    let query = Query::compile(query).unwrap_or_else(|e| panic!("{}", e));
    query
        .paths(data)
        .unwrap_or_else(|e| panic!("{}", e))
        .into_iter()
        .map(|pv| (pv.normalized_path_in(data), pv.value.into_owned()))
        .collect()
}

/// The normalized paths of every match.
pub fn paths(query: &str, data: &Value) -> Vec<String> {
    matches(query, data).into_iter().map(|(path, _)| path).collect()
}

/// Asserts that `query` is ambiguous and returns its matches.
pub fn many(query: &str, data: &Value) -> Vec<Value> {
    let query = Query::compile(query).unwrap_or_else(|e| panic!("{}", e));
    match query.evaluate(data) {
        Ok(Evaluated::Many(found)) => found.into_iter().map(|pv| pv.value.into_owned()).collect(),
        other => panic!("Expected a list of matches for '{}', got {:?}", query.source(), other),
    }
}
