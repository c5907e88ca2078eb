//! Command-line arguments.

use std::time::Duration;

use clap::Parser;
use ctxweave_input::MergeStrategy;
use ctxweave_render::OutputFormat;

use crate::Options;

/// Build a context from the given arguments and render a template with it.
///
/// Each CONTEXT argument is `[key:][format:]data` where data is a file name,
/// `-` for stdin, `+literal` for inline text, `-cmd`/`--cmd` for a function
/// wrapping a command, or `..`/`...` to start a list.
#[derive(Debug, Parser)]
#[command(name = "ctxweave", version, about)]
pub struct Cli {
    /// Template file, `-` for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub template: String,

    /// Output YAML instead of JSON
    #[arg(short, long)]
    pub yaml: bool,

    /// JSON indentation, 0 for compact output
    #[arg(short, long, value_name = "N", default_value_t = ctxweave_render::output::DEFAULT_INDENT)]
    pub indent: usize,

    /// Merge context entries recursively
    #[arg(short, long)]
    pub deep_merge: bool,

    /// Log the calculated context to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Kill function commands that run longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub function_timeout: Option<u64>,

    /// Context entries, merged in order
    #[arg(value_name = "CONTEXT", trailing_var_arg = true, allow_hyphen_values = true)]
    pub contexts: Vec<String>,
}

impl Cli {
    pub fn into_options(self) -> Options {
        let output = if self.yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Json {
                indent: self.indent,
            }
        };
        let merge = if self.deep_merge {
            MergeStrategy::Deep
        } else {
            MergeStrategy::Shallow
        };
        Options {
            template: self.template,
            contexts: self.contexts,
            output,
            merge,
            verbose: self.verbose,
            function_timeout: self.function_timeout.map(Duration::from_secs),
        }
    }
}
