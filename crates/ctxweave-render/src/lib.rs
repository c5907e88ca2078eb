//! # ctxweave-render - templates evaluated against a ctxweave context
//!
//! A template is a stream of YAML documents. Each document is evaluated
//! against a [`Context`](ctxweave_input::Context) by a [`TemplateEngine`] and
//! the results are encoded as JSON or YAML.
//!
//! ```rust
//! use ctxweave_input::{ContextBuilder, MockStdin};
//! use ctxweave_render::{OutputFormat, Renderer};
//!
//! let context = ContextBuilder::new()
//!     .with_stdin(MockStdin::terminal())
//!     .build_from_args(["x::+foo", "y:text:+bar"])
//!     .unwrap();
//!
//! let out = Renderer::new()
//!     .output(OutputFormat::Json { indent: 0 })
//!     .render_to_string("greeting: '{{ x }} {{ y }}'\n", &context)
//!     .unwrap();
//! assert_eq!(out, r#"{"greeting":"foo bar"}"#);
//! ```
//!
//! ## Evaluation
//!
//! The [`MiniJinjaEngine`] walks every document. A string holding exactly one
//! `{{ expression }}` is replaced by the value of the expression, whatever its
//! type. Other strings are rendered as MiniJinja templates. Context functions
//! are callables taking `(args, stdin)`.

mod driver;
pub mod document;
mod engine;
mod error;
pub mod output;
pub mod value;

pub use driver::Renderer;
pub use document::parse_documents;
pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use error::RenderError;
pub use output::OutputFormat;
