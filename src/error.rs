use pathwalk_engine::PathError;
use pathwalk_syntax::SyntaxError;
use thiserror::Error;

/// Errors surfaced by the top-level query API.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid query: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Evaluation failed: {0}")]
    Path(#[from] PathError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
