//! Building the final context from arguments.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::env::{RealStdin, StdinReader};
use crate::error::ContextError;
use crate::loader::Loader;
use crate::merge::MergeStrategy;
use crate::node::Entry;
use crate::parser::parse_arguments;
use crate::value::{ContextValue, Mapping};

/// The merged context handed to the template engine.
pub type Context = Mapping;

/// Evaluates entries in argument order and merges them into a [`Context`].
///
/// # Example
///
/// ```
/// use ctxweave_input::ContextBuilder;
///
/// let context = ContextBuilder::new()
///     .build_from_args(["x::+foo", "y:text:+bar"])
///     .unwrap();
/// assert_eq!(context["x"].as_str(), Some("foo"));
/// assert_eq!(context["y"].as_str(), Some("bar"));
/// ```
#[derive(Clone)]
pub struct ContextBuilder {
    merge: MergeStrategy,
    function_timeout: Option<Duration>,
    stdin: Arc<dyn StdinReader>,
}

impl ContextBuilder {
    /// Shallow merging, no function timeout, real stdin.
    pub fn new() -> Self {
        Self {
            merge: MergeStrategy::default(),
            function_timeout: None,
            stdin: Arc::new(RealStdin),
        }
    }

    pub fn merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// Shorthand for [`merge`](Self::merge) from a `--deep-merge` style flag.
    pub fn deep_merge(self, deep: bool) -> Self {
        self.merge(if deep {
            MergeStrategy::Deep
        } else {
            MergeStrategy::Shallow
        })
    }

    pub fn function_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.function_timeout = timeout;
        self
    }

    /// Read stdin entries from `reader` instead of the process's stdin.
    pub fn with_stdin<R: StdinReader + 'static>(self, reader: R) -> Self {
        self.with_shared_stdin(Arc::new(reader))
    }

    /// Like [`with_stdin`](Self::with_stdin), for a reader also used elsewhere.
    pub fn with_shared_stdin(mut self, reader: Arc<dyn StdinReader>) -> Self {
        self.stdin = reader;
        self
    }

    /// Parse `arguments`, then evaluate them.
    ///
    /// Every argument is parsed before anything is loaded, so grammar errors
    /// are reported before any file is read.
    pub fn build_from_args<I, S>(&self, arguments: I) -> Result<Context, ContextError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = parse_arguments(arguments)?;
        self.build(&entries)
    }

    /// Evaluate `entries` in order and merge the resulting mappings.
    pub fn build(&self, entries: &[Entry]) -> Result<Context, ContextError> {
        let loader = Loader::new(Arc::clone(&self.stdin)).function_timeout(self.function_timeout);
        let mut context = Context::new();
        for entry in entries {
            let mapping = match loader.load(entry)? {
                ContextValue::Mapping(mapping) => mapping,
                other => {
                    return Err(ContextError::NotAMapping {
                        argument: entry.argument.clone(),
                        found: other.kind(),
                    })
                }
            };
            debug!(
                "merging {} key(s) from `{}` ({:?})",
                mapping.len(),
                entry.argument,
                self.merge
            );
            self.merge.apply(&mut context, mapping);
        }
        Ok(context)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
