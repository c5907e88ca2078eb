use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use thiserror::Error;
use wait_timeout::ChildExt;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Command line is empty")]
    EmptyCommand,
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Command `{0}` failed with status {1}")]
    CommandFailed(String, ExitStatus),
}

/// Execute `argv` with `input` piped to its stdin.
///
/// Returns the command's stdout on success. The first element of `argv` is the
/// program, looked up on `PATH`; the rest are passed through verbatim, including
/// empty strings.
///
/// # Arguments
///
/// * `argv` - Program and arguments
/// * `input` - Bytes to write to the command's stdin
/// * `timeout` - Optional timeout; if exceeded, the process is killed
///
/// # Notes
///
/// Stdin is written and stdout drained on helper threads, so payloads larger
/// than the OS pipe buffer do not block. The whole stdout is buffered in memory.
pub fn run_piped(
    argv: &[String],
    input: &[u8],
    timeout: Option<Duration>,
) -> Result<Vec<u8>, ShellError> {
    let (program, args) = argv.split_first().ok_or(ShellError::EmptyCommand)?;
    let command_str = argv.join(" ");
    debug!("running `{}` with {} bytes of input", command_str, input.len());

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ShellError::Spawn {
            program: program.clone(),
            source,
        })?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_vec();
        thread::spawn(move || stdin.write_all(&input))
    });
    let reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut output = Vec::new();
            stdout.read_to_end(&mut output).map(|_| output)
        })
    });

    let status = match timeout {
        Some(duration) => match child.wait_timeout(duration)? {
            Some(status) => status,
            None => {
                child.kill()?;
                child.wait()?;
                return Err(ShellError::Timeout(command_str, duration));
            }
        },
        None => child.wait()?,
    };

    if let Some(writer) = writer {
        match join(writer) {
            // A command may legitimately exit without reading its input.
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }
    let output = match reader {
        Some(reader) => join(reader)?,
        None => Vec::new(),
    };

    if !status.success() {
        return Err(ShellError::CommandFailed(command_str, status));
    }

    Ok(output)
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .map_err(|_| io::Error::other("pipe thread panicked"))?
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_echo() {
        let output = run_piped(&argv(&["echo", "hello"]), b"", None).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "hello");
    }

    #[test]
    fn test_input_piping() {
        let output = run_piped(&argv(&["tr", "a-z", "A-Z"]), b"abc", None).unwrap();
        assert_eq!(output, b"ABC");
    }

    #[test]
    fn test_ignored_input_is_not_an_error() {
        let big = vec![b'x'; 1 << 20];
        let output = run_piped(&argv(&["true"]), &big, None).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_large_payload_round_trips() {
        let big = vec![b'y'; 1 << 20];
        let output = run_piped(&argv(&["cat"]), &big, None).unwrap();
        assert_eq!(output.len(), big.len());
    }

    #[test]
    fn test_timeout() {
        let start = std::time::Instant::now();
        let res = run_piped(&argv(&["sleep", "2"]), b"", Some(Duration::from_millis(300)));
        assert!(matches!(res, Err(ShellError::Timeout(_, _))));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_command_failed_includes_command_line() {
        let res = run_piped(&argv(&["sh", "-c", "exit 3"]), b"", None);
        match res {
            Err(ShellError::CommandFailed(cmd_str, status)) => {
                assert_eq!(cmd_str, "sh -c exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("Expected CommandFailed error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program() {
        let res = run_piped(&argv(&["ctxweave-no-such-program"]), b"", None);
        assert!(matches!(res, Err(ShellError::Spawn { .. })));
    }

    #[test]
    fn test_empty_argv() {
        assert!(matches!(run_piped(&[], b"", None), Err(ShellError::EmptyCommand)));
    }
}
