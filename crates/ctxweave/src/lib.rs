//! # ctxweave - weave command-line context into templates
//!
//! `ctxweave` turns a list of context arguments into one mapping and renders a
//! stream of YAML template documents against it, writing JSON or YAML.
//!
//! ```text
//! ctxweave -t page.yaml site.yaml posts:... posts/*.md today::-date
//! ```
//!
//! The argument grammar and context loading live in [`ctxweave_input`];
//! evaluation and output encoding in [`ctxweave_render`]. This crate wires
//! them to the command line.

pub mod cli;

use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use ctxweave_input::{parse_arguments, ContextBuilder, MergeStrategy, StdinReader};
use ctxweave_render::{OutputFormat, Renderer};

/// Template path meaning "read the template from stdin".
pub const STDIN_TEMPLATE: &str = "-";

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Template file, or [`STDIN_TEMPLATE`].
    pub template: String,
    /// Context arguments in command-line order.
    pub contexts: Vec<String>,
    pub output: OutputFormat,
    pub merge: MergeStrategy,
    /// Log the calculated context at `info`.
    pub verbose: bool,
    pub function_timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            template: STDIN_TEMPLATE.to_string(),
            contexts: Vec::new(),
            output: OutputFormat::default(),
            merge: MergeStrategy::default(),
            verbose: false,
            function_timeout: None,
        }
    }
}

/// Builds the context, renders the template and writes the result to `out`.
pub fn run<W: Write>(options: &Options, stdin: Arc<dyn StdinReader>, out: &mut W) -> Result<()> {
    let entries = parse_arguments(&options.contexts)?;

    let template_from_stdin = options.template == STDIN_TEMPLATE;
    if template_from_stdin {
        if let Some(entry) = entries.iter().find(|entry| entry.node.reads_stdin()) {
            bail!(
                "context argument {:?} reads stdin, which is already used for the template; pass the template with -t",
                entry.argument
            );
        }
    }

    let context = ContextBuilder::new()
        .merge(options.merge)
        .function_timeout(options.function_timeout)
        .with_shared_stdin(Arc::clone(&stdin))
        .build(&entries)?;

    if options.verbose {
        let dump = serde_yaml::to_string(&context).context("cannot encode the context")?;
        log::info!("calculated context:\n{}", dump);
    }

    let template = if template_from_stdin {
        let bytes = stdin.read_to_end().context("cannot read the template from stdin")?;
        String::from_utf8(bytes).context("template on stdin is not UTF-8")?
    } else {
        fs::read_to_string(&options.template)
            .with_context(|| format!("cannot read template {}", options.template))?
    };

    Renderer::new()
        .output(options.output)
        .render(&template, &context, out)?;
    Ok(())
}
