//! Render driver: template documents in, encoded output out.

use std::io::Write;

use ctxweave_input::Context;

use crate::document::parse_documents;
use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::RenderError;
use crate::output::OutputFormat;

/// Evaluates every document of a template against one context.
///
/// Nothing is written until all documents have been evaluated and encoded, so
/// a failing document leaves the output untouched.
pub struct Renderer<E: TemplateEngine = MiniJinjaEngine> {
    engine: E,
    output: OutputFormat,
}

impl Renderer<MiniJinjaEngine> {
    /// Creates a renderer with the MiniJinja engine and the default output.
    pub fn new() -> Self {
        Self::with_engine(MiniJinjaEngine::new())
    }
}

impl Default for Renderer<MiniJinjaEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TemplateEngine> Renderer<E> {
    /// Creates a renderer around a custom engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            output: OutputFormat::default(),
        }
    }

    /// Sets the output encoding.
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Renders `template` into a string.
    pub fn render_to_string(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        let documents = parse_documents(template)?;
        let mut rendered = Vec::with_capacity(documents.len());
        for (index, document) in documents.iter().enumerate() {
            log::debug!("evaluating document {}", index);
            rendered.push(self.engine.evaluate(document, context)?);
        }
        self.output.encode_all(&rendered)
    }

    /// Renders `template` and writes the result to `out`.
    pub fn render<W: Write>(
        &self,
        template: &str,
        context: &Context,
        out: &mut W,
    ) -> Result<(), RenderError> {
        let encoded = self.render_to_string(template, context)?;
        out.write_all(encoded.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
