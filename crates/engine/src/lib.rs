//! Selector and path combinator engine for JSONPath-style queries.
//!
//! A [`Path`] is assembled step by step from [`PlainSelector`]s (exactly one
//! result or an error) and [`AmbiguousSelector`]s (zero or more results
//! delivered through a callback). Evaluating it against a `serde_json::Value`
//! yields either a single [`PathValue`] or every match, each carrying the
//! exact sequence of segments that reached it.
//!
//! # Key Types
//!
//! - [`Path`]: the compiled, immutable query
//! - [`PathValue`]: a value tagged with its path from the root
//! - [`EvalContext`]: the scoped "current element" binding and evaluation limits
//! - [`Evaluable`]: the expression capability used by keys, filters, slices and scripts
//!
//! # Example
//!
//! ```
//! use pathwalk_engine::{AmbiguousSelector, EvalContext, Evaluated, Path, PlainSelector};
//! use serde_json::json;
//!
//! let data = json!({ "x": { "id": 1 }, "y": { "id": 2 } });
//! let path = Path::root()
//!     .with_ambiguous_selector(AmbiguousSelector::Star)
//!     .with_plain_selector(PlainSelector::key("id"));
//!
//! let Evaluated::Many(matches) = path.evaluate(&EvalContext::new(), &data).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(matches[1].path, vec!["y".to_string(), "id".to_string()]);
//! ```

pub mod context;
pub mod error;
pub mod expression;
pub mod path;
pub mod selector;
pub mod value;

pub use context::{EvalContext, Limits};
pub use error::PathError;
pub use expression::{Evaluable, ExprValue, Literal};
pub use path::{Evaluated, Path, PathMatcher};
pub use selector::{AmbiguousSelector, BranchKey, BranchMatcher, PlainSelector};
pub use value::{PathValue, index_label, select_value, type_name, visit_all};
