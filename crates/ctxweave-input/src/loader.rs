//! Evaluation of parsed entries.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::env::StdinReader;
use crate::error::{ContextError, LoadError};
use crate::format::Format;
use crate::function::FunctionBridge;
use crate::node::{ContentNode, Entry, ListNode};
use crate::value::{ContextValue, Mapping};

/// Turns entries into values. All I/O happens here, never during parsing.
#[derive(Clone)]
pub struct Loader {
    stdin: Arc<dyn StdinReader>,
    function_timeout: Option<Duration>,
}

impl Loader {
    pub fn new(stdin: Arc<dyn StdinReader>) -> Self {
        Self {
            stdin,
            function_timeout: None,
        }
    }

    /// Timeout applied to every call of the functions this loader creates.
    pub fn function_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.function_timeout = timeout;
        self
    }

    /// Evaluate one entry, wrapping the value as `{key: value}` when keyed.
    pub fn load(&self, entry: &Entry) -> Result<ContextValue, ContextError> {
        debug!("loading `{}`", entry.argument);
        let value = self.load_node(entry)?;
        Ok(match &entry.key {
            Some(key) => value.keyed(key.as_str()),
            None => value,
        })
    }

    fn load_node(&self, entry: &Entry) -> Result<ContextValue, ContextError> {
        let fail = |source: LoadError| ContextError::load(entry.argument.as_str(), source);

        match &entry.node {
            ContentNode::File { filename, format } => {
                let bytes = fs::read(filename).map_err(|source| {
                    fail(LoadError::ReadFile {
                        path: filename.clone(),
                        source,
                    })
                })?;
                format.decode(&bytes).map_err(fail)
            }
            ContentNode::Stdin { format } => self.load_stdin(&entry.argument, format).map_err(fail),
            ContentNode::Text { text, format } => format.decode(text.as_bytes()).map_err(fail),
            ContentNode::Function(function) => Ok(ContextValue::Function(
                FunctionBridge::new(&function.command, function.raw_input, function.raw_output)
                    .with_timeout(self.function_timeout),
            )),
            ContentNode::List(list) => self.load_list(list),
        }
    }

    fn load_stdin(&self, argument: &str, format: &Format) -> Result<ContextValue, LoadError> {
        if self.stdin.is_terminal() {
            warn!(
                "`{}` reads stdin from a terminal; end the input with Ctrl-D",
                argument
            );
        }
        let bytes = self.stdin.read_to_end().map_err(LoadError::StdinFailed)?;
        format.decode(&bytes)
    }

    fn load_list(&self, list: &ListNode) -> Result<ContextValue, ContextError> {
        let mut items = Vec::with_capacity(list.entries.len());
        for child in &list.entries {
            let value = self.load(child)?;
            if !list.show_metadata {
                items.push(value);
                continue;
            }

            let mut item = Mapping::new();
            item.insert("content".to_string(), value);
            for (field, meta) in child.node.metadata() {
                item.entry(field).or_insert(meta);
            }
            items.push(ContextValue::Mapping(item));
        }
        Ok(ContextValue::Sequence(items))
    }
}
