//! Parsed context entries.
//!
//! Every command-line argument becomes an [`Entry`]: the original text, an
//! optional key and the [`ContentNode`] describing where its value comes from.

use std::path::PathBuf;

use crate::format::Format;
use crate::value::{ContextValue, Mapping};

/// One parsed context argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The argument as given, for error messages.
    pub argument: String,
    /// When set, the value is wrapped as `{key: value}`.
    pub key: Option<String>,
    pub node: ContentNode,
}

impl Entry {
    pub fn new(argument: impl Into<String>, key: Option<String>, node: ContentNode) -> Self {
        Self {
            argument: argument.into(),
            key,
            node,
        }
    }
}

/// Where an entry's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// A file read from disk.
    File { filename: PathBuf, format: Format },
    /// The process's standard input.
    Stdin { format: Format },
    /// Content written inline in the argument.
    Text { text: String, format: Format },
    /// An external command exposed as a callable.
    Function(FunctionNode),
    /// The entries that follow, collected into a sequence.
    List(ListNode),
}

/// `-cmd` / `--cmd` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub command: String,
    pub raw_input: bool,
    pub raw_output: bool,
}

/// `..` / `...` entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListNode {
    pub entries: Vec<Entry>,
    /// Wrap each element as `{content, ...metadata}`.
    pub show_metadata: bool,
    /// Format given to children that do not state one.
    pub child_format: Format,
}

impl ListNode {
    pub fn new(child_format: Format, show_metadata: bool) -> Self {
        Self {
            entries: Vec::new(),
            show_metadata,
            child_format,
        }
    }
}

impl ContentNode {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentNode::File { .. } => "file",
            ContentNode::Stdin { .. } => "stdin",
            ContentNode::Text { .. } => "text",
            ContentNode::Function(_) => "function",
            ContentNode::List(_) => "list",
        }
    }

    /// Whether loading this node consumes stdin, directly or through a list.
    pub fn reads_stdin(&self) -> bool {
        match self {
            ContentNode::Stdin { .. } => true,
            ContentNode::List(list) => list.entries.iter().any(|entry| entry.node.reads_stdin()),
            _ => false,
        }
    }

    /// Extra fields shown next to `content` in a `...` list.
    ///
    /// Files contribute `filename`, `basename` and `name` (the basename up to
    /// its last `.`); everything else contributes nothing.
    pub fn metadata(&self) -> Mapping {
        let mut metadata = Mapping::new();
        match self {
            ContentNode::File { filename, .. } => {
                let filename = filename.to_string_lossy().into_owned();
                let basename = basename(&filename).to_string();
                let name = match basename.rfind('.') {
                    Some(dot) => basename[..dot].to_string(),
                    None => basename.clone(),
                };
                metadata.insert("filename".into(), ContextValue::String(filename));
                metadata.insert("basename".into(), ContextValue::String(basename));
                metadata.insert("name".into(), ContextValue::String(name));
            }
            ContentNode::Stdin { .. }
            | ContentNode::Text { .. }
            | ContentNode::Function(_)
            | ContentNode::List(_) => {}
        }
        metadata
    }
}

/// Last path element, ignoring trailing slashes.
fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(slash) => &trimmed[slash + 1..],
        None => trimmed,
    }
}
