//! Query syntax for the pathwalk engine.
//!
//! Compiles JSONPath query text into a [`pathwalk_engine::Path`] and provides
//! the expression language used inside filters (`[?(...)]`), computed keys
//! (`[(...)]`) and scripts (`.(...)`).
//!
//! ```
//! use pathwalk_syntax::compile;
//!
//! let path = compile("$.store.book[?(@.price < 10)].title").unwrap();
//! assert!(!path.is_deterministic());
//! ```

pub mod ast;
pub mod engine;
pub mod error;
mod parser;

pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use error::SyntaxError;
pub use parser::{compile, parse_expression};
