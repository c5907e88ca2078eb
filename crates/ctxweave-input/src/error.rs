//! Error types for context building.
//!
//! Each stage has its own error: [`ParseError`] for the argument grammar (raised
//! before any I/O), [`LoadError`] for reading and decoding content, and
//! [`CallError`] for function calls made by the template evaluator.
//! [`ContextError`] is what [`ContextBuilder`](crate::ContextBuilder) returns and
//! names the offending argument.

use std::io;
use std::path::PathBuf;

use ctxweave_pipe::ShellError;

/// Malformed context argument.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// `:data`, the key before the colon is empty.
    #[error("argument `{0}` has an empty key")]
    EmptyKey(String),

    /// `key:` or `key:fmt:`, nothing to load.
    #[error("argument `{0}` has nothing to load after the key")]
    EmptyEntry(String),

    /// `key:-` followed by nothing usable as a command.
    #[error("argument `{0}` declares a function without a command")]
    EmptyCommand(String),

    /// Standard input can only be consumed once per run.
    #[error("argument `{argument}` reads stdin, which is already read by `{previous}`")]
    RepeatedStdin { argument: String, previous: String },
}

/// Failure to read or decode a piece of content.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a context file failed.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading stdin failed.
    #[error("failed to read stdin: {0}")]
    StdinFailed(#[source] io::Error),

    /// The format token is not one we know how to decode.
    #[error("format `{0}` not supported (expected yaml, json, kv or text)")]
    UnsupportedFormat(String),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line not in kv format: {0:?}")]
    KvLine(String),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure of a context function invoked from a template.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("function command line arguments must be strings (use stdin or a structured-input function), got {0}")]
    NonStringArgument(String),

    #[error("function `{0}` takes raw text on stdin, got {1}")]
    NonStringInput(String, String),

    #[error("failed to encode function input as JSON: {0}")]
    EncodeInput(#[source] serde_json::Error),

    #[error("function `{command}` failed: {source}")]
    Process {
        command: String,
        #[source]
        source: ShellError,
    },

    #[error("function `{command}` produced undecodable output: {source}")]
    DecodeOutput {
        command: String,
        #[source]
        source: LoadError,
    },
}

/// Error building the context from a list of arguments.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot load `{argument}`: {source}")]
    Load {
        argument: String,
        #[source]
        source: LoadError,
    },

    /// A top-level entry without a key must evaluate to a mapping.
    #[error("`{argument}` does not evaluate to a mapping (found {found}); give it a key, e.g. `name:{argument}`")]
    NotAMapping { argument: String, found: &'static str },
}

impl ContextError {
    pub(crate) fn load(argument: impl Into<String>, source: LoadError) -> Self {
        Self::Load {
            argument: argument.into(),
            source,
        }
    }
}
