//! Composition of selectors into an evaluable path.
//!
//! A path is read left to right. Plain steps accumulate in a deterministic
//! run; each ambiguous step wraps everything before it as the parent of a
//! new branching node, whose own plain steps form its trailing tail.
use crate::context::EvalContext;
use crate::error::PathError;
use crate::selector::{AmbiguousSelector, BranchKey, PlainSelector, apply_chain};
use crate::value::PathValue;
use serde_json::Value;
use std::ops::ControlFlow;

/// Callback receiving every surfaced match together with the branch keys of
/// the ambiguous steps crossed to reach it.
pub type PathMatcher<'m, 'v> = dyn FnMut(&[BranchKey], PathValue<'v>) -> ControlFlow<()> + 'm;

/// A compiled query.
#[derive(Debug, Clone)]
pub enum Path {
    /// Plain steps only: yields exactly one value or an error.
    Deterministic(Vec<PlainSelector>),
    /// Every match of `parent` fans out through `branch`, and every branch
    /// then runs through `trailing`.
    Branching {
        parent: Box<Path>,
        branch: AmbiguousSelector,
        trailing: Vec<PlainSelector>,
    },
}

impl Default for Path {
    fn default() -> Self {
        Path::Deterministic(Vec::new())
    }
}

/// The outcome of [`Path::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated<'v> {
    Single(PathValue<'v>),
    /// Always produced by a branching path, whatever the number of matches.
    Many(Vec<PathValue<'v>>),
}

impl<'v> Evaluated<'v> {
    pub fn into_vec(self) -> Vec<PathValue<'v>> {
        match self {
            Evaluated::Single(pv) => vec![pv],
            Evaluated::Many(matches) => matches,
        }
    }

    pub fn into_owned(self) -> Evaluated<'static> {
        match self {
            Evaluated::Single(pv) => Evaluated::Single(pv.into_owned()),
            Evaluated::Many(matches) => {
                Evaluated::Many(matches.into_iter().map(PathValue::into_owned).collect())
            }
        }
    }
}

impl Path {
    /// The empty path, selecting the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Path::Deterministic(_))
    }

    pub fn with_plain_selector(mut self, selector: PlainSelector) -> Self {
        match &mut self {
            Path::Deterministic(selectors) => selectors.push(selector),
            Path::Branching { trailing, .. } => trailing.push(selector),
        }
        self
    }

    pub fn with_ambiguous_selector(self, branch: AmbiguousSelector) -> Self {
        Path::Branching {
            parent: Box::new(self),
            branch,
            trailing: Vec::new(),
        }
    }

    /// Number of ambiguous steps in the path.
    pub fn branch_depth(&self) -> usize {
        match self {
            Path::Deterministic(_) => 0,
            Path::Branching { parent, .. } => parent.branch_depth() + 1,
        }
    }

    /// Evaluates against `root`. A deterministic path returns its single value
    /// or the first selector error; a branching path collects every match in
    /// traversal order.
    pub fn evaluate<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
    ) -> Result<Evaluated<'v>, PathError> {
        match self {
            Path::Deterministic(selectors) => {
                apply_chain(selectors, ctx, root, PathValue::root(root)).map(Evaluated::Single)
            }
            Path::Branching { .. } => {
                let mut matches = Vec::new();
                let _ = self.visit_matches(ctx, root, &mut |_, pv| {
                    matches.push(pv);
                    ControlFlow::Continue(())
                });
                log::trace!("Branching path produced {} matches", matches.len());
                Ok(Evaluated::Many(matches))
            }
        }
    }

    /// Streams every match to `matcher`, depth first and left to right.
    ///
    /// A failing deterministic run produces no match here rather than an
    /// error; only [`Path::evaluate`] surfaces the error of a deterministic
    /// path. The traversal ends early when `matcher` returns `Break`.
    pub fn visit_matches<'v>(
        &self,
        ctx: &EvalContext<'v>,
        root: &'v Value,
        matcher: &mut PathMatcher<'_, 'v>,
    ) -> ControlFlow<()> {
        match self {
            Path::Deterministic(selectors) => {
                match apply_chain(selectors, ctx, root, PathValue::root(root)) {
                    Ok(pv) => matcher(&[], pv),
                    Err(err) => {
                        log::trace!("Deterministic path produced no match: {}", err);
                        ControlFlow::Continue(())
                    }
                }
            }
            Path::Branching {
                parent,
                branch,
                trailing,
            } => parent.visit_matches(ctx, root, &mut |keys, pv| {
                branch.select(ctx, root, pv, &mut |key, sub| {
                    match apply_chain(trailing, ctx, root, sub) {
                        Ok(out) => {
                            let mut branch_keys = Vec::with_capacity(keys.len() + 1);
                            branch_keys.extend_from_slice(keys);
                            branch_keys.push(key);
                            matcher(&branch_keys, out)
                        }
                        Err(err) => {
                            log::trace!("Dropping branch {:?}: {}", key, err);
                            ControlFlow::Continue(())
                        }
                    }
                })
            }),
        }
    }
}
