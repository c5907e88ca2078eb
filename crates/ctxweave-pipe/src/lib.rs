//! External command plumbing for `ctxweave`.
//!
//! Commands are given as a single command line that is split on single spaces
//! into an argv (no shell is involved and no quoting is understood). Input is
//! piped to the child's stdin, stdout is captured and stderr is inherited so
//! diagnostics reach the user unchanged.
//!
//! ```no_run
//! use ctxweave_pipe::CommandLine;
//!
//! let out = CommandLine::parse("tr a-z A-Z").run(b"abc").unwrap();
//! assert_eq!(out, b"ABC");
//! ```

pub mod command;
pub mod process;

pub use command::CommandLine;
pub use process::{run_piped, ShellError};
