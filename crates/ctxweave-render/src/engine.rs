//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between a built
//! context and whatever evaluates template documents against it. The default
//! implementation is [`MiniJinjaEngine`].

use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior, Value};
use serde_json::{Map, Value as Json};

use ctxweave_input::Context;

use crate::error::RenderError;
use crate::value::{context_value, json_value};

/// Evaluates one template document against a context.
///
/// Documents are plain data (mappings, sequences, scalars); the engine decides
/// which parts of them are templates.
pub trait TemplateEngine: Send + Sync {
    /// Evaluates `document` with `context` and returns the resulting data.
    fn evaluate(&self, document: &Json, context: &Context) -> Result<Json, RenderError>;
}

/// MiniJinja-based template engine.
///
/// Walks a document and evaluates every string in it:
/// - a string that is exactly one `{{ expression }}` is evaluated as an
///   expression and keeps the type of the result;
/// - any other string is rendered as a template and stays a string;
/// - mapping keys are rendered as templates;
/// - other scalars pass through.
///
/// Undefined variables are errors.
///
/// # Example
///
/// ```rust
/// use ctxweave_input::{ContextValue, Mapping};
/// use ctxweave_render::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let mut context = Mapping::new();
/// context.insert("items".into(), ContextValue::from(json!([1, 2])));
///
/// let engine = MiniJinjaEngine::new();
/// let out = engine
///     .evaluate(&json!({"all": "{{ items }}", "n": "{{ items | length }} items"}), &context)
///     .unwrap();
/// assert_eq!(out, json!({"all": [1, 2], "n": "2 items"}));
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new engine with strict undefined handling.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Lets callers register extra filters or functions before rendering.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    fn evaluate_node(&self, node: &Json, root: &Value) -> Result<Json, RenderError> {
        match node {
            Json::String(source) => self.evaluate_string(source, root),
            Json::Array(items) => items
                .iter()
                .map(|item| self.evaluate_node(item, root))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Json::Object(map) => {
                let mut out = Map::new();
                for (key, value) in map {
                    let key = self.env.render_str(key, root)?;
                    out.insert(key, self.evaluate_node(value, root)?);
                }
                Ok(Json::Object(out))
            }
            other => Ok(other.clone()),
        }
    }

    fn evaluate_string(&self, source: &str, root: &Value) -> Result<Json, RenderError> {
        match sole_expression(source) {
            Some(expression) => {
                let value = self
                    .env
                    .compile_expression_owned(expression.to_string())?
                    .eval(root)?;
                if value.is_undefined() {
                    return Err(Error::new(
                        ErrorKind::UndefinedError,
                        format!("`{}` is undefined", expression),
                    )
                    .into());
                }
                Ok(json_value(&value)?)
            }
            None => Ok(Json::String(self.env.render_str(source, root)?)),
        }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn evaluate(&self, document: &Json, context: &Context) -> Result<Json, RenderError> {
        let root = context_value(context);
        self.evaluate_node(document, &root)
    }
}

/// Returns the inner expression when `source` is exactly one `{{ ... }}` block.
fn sole_expression(source: &str) -> Option<&str> {
    let inner = source
        .trim()
        .strip_prefix("{{")?
        .strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") || inner.contains("{%") {
        return None;
    }
    let inner = inner.strip_prefix('-').unwrap_or(inner);
    let inner = inner.strip_suffix('-').unwrap_or(inner);
    let inner = inner.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}
