//! JSONPath queries over `serde_json` values.
//!
//! Every result carries the exact path that produced it, so callers can tell
//! not only *what* matched but *where*.
//!
//! # Example
//!
//! ```
//! use pathwalk::{get, get_with_paths};
//! use serde_json::json;
//!
//! let data = json!({ "store": { "book": [
//!     { "title": "Sayings of the Century", "price": 8.95 },
//!     { "title": "Sword of Honour", "price": 12.99 }
//! ] } });
//!
//! assert_eq!(get("$.store.book[0].title", &data).unwrap(), json!("Sayings of the Century"));
//! assert_eq!(
//!     get("$.store.book[?(@.price > 10)].title", &data).unwrap(),
//!     json!(["Sword of Honour"])
//! );
//!
//! let matches = get_with_paths("$..price", &data).unwrap();
//! assert_eq!(matches[1].normalized_path(), "$.store.book[1].price");
//! ```

pub mod error;
pub mod options;
pub mod query;

// --- Public API ---
pub use error::Error;
pub use options::QueryOptions;
pub use query::{Match, Query};

pub use pathwalk_engine::{
    AmbiguousSelector, BranchKey, EvalContext, Evaluable, Evaluated, ExprValue, Limits, Literal,
    Path, PathError, PathValue, PlainSelector,
};
pub use pathwalk_syntax::{Expression, SyntaxError, compile, parse_expression};

use serde_json::Value;

/// Evaluates `query` against `data`.
///
/// A query made only of plain steps returns the selected value, or an error
/// if any step fails. A query with a wildcard, key list, slice, filter or
/// recursive descent returns a JSON array of every match, which may be empty.
pub fn get(query: &str, data: &Value) -> Result<Value, Error> {
    Query::compile(query)?.get(data)
}

/// Like [`get`], but returns each match along with its path.
pub fn get_with_paths(query: &str, data: &Value) -> Result<Vec<PathValue<'static>>, Error> {
    Query::compile(query)?.paths(data)
}
