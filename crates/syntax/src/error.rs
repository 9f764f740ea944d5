use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Query parse error in '{query}': {message}")]
    QueryParse { query: String, message: String },

    #[error("Empty query")]
    EmptyQuery,
}

impl SyntaxError {
    pub fn parse(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryParse {
            query: query.into(),
            message: message.into(),
        }
    }
}
