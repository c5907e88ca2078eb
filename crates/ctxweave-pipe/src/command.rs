use std::fmt;
use std::time::Duration;

use crate::process::{run_piped, ShellError};

/// An external command built from a space-separated command line.
///
/// The command line is split on every single space, exactly. There is no
/// quoting or escaping, so `"printf a  b"` yields the argv
/// `["printf", "a", "", "b"]` and an argument can never contain a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandLine {
    pub fn parse(command: &str) -> Self {
        Self {
            argv: command.split(' ').map(str::to_string).collect(),
            timeout: None,
        }
    }

    /// Kill the command if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append extra arguments after the ones from the command line.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the command with `input` on stdin and return its stdout.
    pub fn run(&self, input: &[u8]) -> Result<Vec<u8>, ShellError> {
        run_piped(&self.argv, input, self.timeout)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}
