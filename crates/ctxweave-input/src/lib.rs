//! Build a template context from command-line arguments.
//!
//! Each argument describes one piece of content and, optionally, the key it
//! is stored under:
//!
//! | argument          | meaning                                               |
//! |-------------------|-------------------------------------------------------|
//! | `vars.yaml`       | load a YAML/JSON file and merge its keys              |
//! | `cfg:vars.yaml`   | load the file under the key `cfg`                     |
//! | `notes::notes.md` | load the file as a raw string (`::` = text format)    |
//! | `x:json:a.json`   | explicit format: `yaml`, `json`, `kv` or `text`       |
//! | `x:+{a: 1}`       | inline content instead of a file                      |
//! | `x:-`             | read standard input                                   |
//! | `f:-cmd args`     | function: JSON in, YAML/JSON out                      |
//! | `f::--cmd args`   | function: text in, text out                           |
//! | `xs:..`           | following unkeyed arguments form a list under `xs`    |
//! | `xs:...`          | same, each element as `{content, filename, ...}`      |
//!
//! # Architecture
//!
//! ```text
//! arguments ──ContextParser──▶ [Entry] ──Loader──▶ ContextValue ──MergeStrategy──▶ Context
//!                (no I/O)                  (files, stdin,
//!                                          FunctionBridge)
//! ```
//!
//! # Testing
//!
//! Stdin is read through [`env::StdinReader`], so tests can substitute a mock:
//!
//! ```
//! use ctxweave_input::{ContextBuilder, MockStdin};
//!
//! let context = ContextBuilder::new()
//!     .with_stdin(MockStdin::piped("answer: 42"))
//!     .build_from_args(["-"])
//!     .unwrap();
//! assert_eq!(serde_json::to_value(&context["answer"]).unwrap(), 42);
//! ```

mod context;
pub mod env;
mod error;
pub mod format;
mod function;
mod loader;
pub mod merge;
mod node;
mod parser;
mod value;

pub use context::{Context, ContextBuilder};
pub use error::{CallError, ContextError, LoadError, ParseError};
pub use format::Format;
pub use function::FunctionBridge;
pub use loader::Loader;
pub use merge::MergeStrategy;
pub use node::{ContentNode, Entry, FunctionNode, ListNode};
pub use parser::{parse_arguments, ContextParser};
pub use value::{ContextValue, Mapping};

pub use env::{MockStdin, RealStdin, StdinReader};
