//! Error types for template rendering.
//!
//! [`RenderError`] covers everything after the context is built: reading and
//! parsing template documents, evaluating them, and encoding the output.
//! Evaluator errors are kept intact so a failing context function can still be
//! reached through [`std::error::Error::source`].

use std::fmt;

/// Error type for rendering operations.
#[derive(Debug)]
pub enum RenderError {
    /// The template evaluator rejected a document or an expression in it.
    TemplateError(minijinja::Error),

    /// A template document is not valid YAML.
    DocumentError(String),

    /// Output encoding failed.
    SerializationError(String),

    /// I/O error (reading the template, writing output).
    IoError(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError(err) => write!(f, "template error: {}", err),
            RenderError::DocumentError(msg) => write!(f, "invalid template document: {}", msg),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::TemplateError(err) => Some(err),
            RenderError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> Self {
        RenderError::DocumentError(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::TemplateError(err)
    }
}
