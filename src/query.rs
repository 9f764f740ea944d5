//! The compiled query handle used by the convenience functions and the CLI.
use crate::error::Error;
use crate::options::QueryOptions;
use pathwalk_engine::{BranchKey, EvalContext, Evaluated, Path, PathValue};
use serde_json::Value;
use std::ops::ControlFlow;

/// One match of a query together with the branch keys that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'v> {
    pub keys: Vec<BranchKey>,
    pub value: PathValue<'v>,
}

/// A compiled query plus the options it is evaluated with.
///
/// Compiling once and evaluating many times is cheap: the query holds no
/// per-evaluation state.
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    path: Path,
    options: QueryOptions,
}

impl Query {
    pub fn compile(source: &str) -> Result<Self, Error> {
        let path = pathwalk_syntax::compile(source)?;
        Ok(Self {
            source: source.to_string(),
            path,
            options: QueryOptions::default(),
        })
    }

    /// Wraps a path assembled directly with the selector builder.
    pub fn from_path(path: Path) -> Self {
        Self {
            source: String::new(),
            path,
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    fn context(&self) -> EvalContext<'static> {
        EvalContext::with_limits(self.options.limits())
    }

    /// Evaluates the query. Deterministic queries yield a single value or the
    /// error that stopped them; any other query yields the list of matches.
    pub fn evaluate<'v>(&self, data: &'v Value) -> Result<Evaluated<'v>, Error> {
        if self.path.is_deterministic() || self.options.max_results.is_none() {
            return Ok(self.path.evaluate(&self.context(), data)?);
        }
        Ok(Evaluated::Many(
            self.matches(data).into_iter().map(|m| m.value).collect(),
        ))
    }

    /// Streams matches, honouring `max_results`. A deterministic query that
    /// fails contributes no match instead of an error.
    pub fn matches<'v>(&self, data: &'v Value) -> Vec<Match<'v>> {
        let limit = self.options.max_results.unwrap_or(usize::MAX);
        let mut matches = Vec::new();
        if limit == 0 {
            return matches;
        }
        let _ = self
            .path
            .visit_matches(&self.context(), data, &mut |keys, value| {
                matches.push(Match {
                    keys: keys.to_vec(),
                    value,
                });
                if matches.len() >= limit {
                    log::debug!("'{}' reached the limit of {} matches", self.source, limit);
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
        matches
    }

    /// The first match, without visiting the rest of the document.
    pub fn first<'v>(&self, data: &'v Value) -> Option<PathValue<'v>> {
        let mut first = None;
        let _ = self.path.visit_matches(&self.context(), data, &mut |_, value| {
            first = Some(value);
            ControlFlow::Break(())
        });
        first
    }

    /// The plain value for a deterministic query, or an array of the matched
    /// values for any other query.
    pub fn get(&self, data: &Value) -> Result<Value, Error> {
        Ok(match self.evaluate(data)? {
            Evaluated::Single(pv) => pv.value.into_owned(),
            Evaluated::Many(matches) => Value::Array(
                matches
                    .into_iter()
                    .map(|pv| pv.value.into_owned())
                    .collect(),
            ),
        })
    }

    pub fn values(&self, data: &Value) -> Result<Vec<Value>, Error> {
        Ok(self
            .evaluate(data)?
            .into_vec()
            .into_iter()
            .map(|pv| pv.value.into_owned())
            .collect())
    }

    /// Every match with the path that reached it.
    pub fn paths(&self, data: &Value) -> Result<Vec<PathValue<'static>>, Error> {
        Ok(self
            .evaluate(data)?
            .into_vec()
            .into_iter()
            .map(PathValue::into_owned)
            .collect())
    }
}
