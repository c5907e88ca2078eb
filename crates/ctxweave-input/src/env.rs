//! Environment abstractions for testability.
//!
//! Standard input is the only process-wide resource the loaders touch. It is
//! reached through [`StdinReader`] so tests can feed content without piping.

use std::io::{self, IsTerminal, Read};
use std::sync::Mutex;

/// Source of standard input for stdin entries and stdin templates.
pub trait StdinReader: Send + Sync {
    /// Whether stdin is attached to a terminal rather than a pipe or file.
    fn is_terminal(&self) -> bool;

    /// Read stdin to the end.
    ///
    /// Like the real stream, a second call returns whatever is left, which is
    /// normally nothing.
    fn read_to_end(&self) -> io::Result<Vec<u8>>;
}

// === Real implementation ===

/// The process's own stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealStdin;

impl StdinReader for RealStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_to_end(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

// === Mock implementation for testing ===

/// In-memory stdin for tests.
///
/// Content is handed out once, then the mock behaves like an exhausted pipe.
#[derive(Debug)]
pub struct MockStdin {
    is_terminal: bool,
    content: Mutex<Option<Vec<u8>>>,
}

impl MockStdin {
    /// A terminal with nothing typed.
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            content: Mutex::new(None),
        }
    }

    /// `content` piped in.
    pub fn piped(content: impl Into<Vec<u8>>) -> Self {
        Self {
            is_terminal: false,
            content: Mutex::new(Some(content.into())),
        }
    }

    /// A pipe that is already closed.
    pub fn piped_empty() -> Self {
        Self::piped(Vec::new())
    }
}

impl StdinReader for MockStdin {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn read_to_end(&self) -> io::Result<Vec<u8>> {
        let mut content = self
            .content
            .lock()
            .map_err(|_| io::Error::other("mock stdin lock poisoned"))?;
        Ok(content.take().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_stdin_terminal() {
        let stdin = MockStdin::terminal();
        assert!(stdin.is_terminal());
        assert_eq!(stdin.read_to_end().unwrap(), b"");
    }

    #[test]
    fn mock_stdin_piped() {
        let stdin = MockStdin::piped("hello world");
        assert!(!stdin.is_terminal());
        assert_eq!(stdin.read_to_end().unwrap(), b"hello world");
    }

    #[test]
    fn mock_stdin_is_exhausted_after_first_read() {
        let stdin = MockStdin::piped("once");
        assert_eq!(stdin.read_to_end().unwrap(), b"once");
        assert_eq!(stdin.read_to_end().unwrap(), b"");
    }

    #[test]
    fn mock_stdin_piped_empty() {
        let stdin = MockStdin::piped_empty();
        assert!(!stdin.is_terminal());
        assert!(stdin.read_to_end().unwrap().is_empty());
    }
}
