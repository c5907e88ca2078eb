//! The context argument grammar.
//!
//! ```text
//! argument := "+" inline                unkeyed inline content
//!           | key ":" source            keyed entry, closes any open list
//!           | data                      unkeyed entry
//! source   := "+" inline | format ":" data | data
//! data     := ".." | "..." | "+" inline | "-" | "--" command | "-" command | filename
//! ```
//!
//! An empty `format` means `text`, so `key::data` loads `data` as a raw
//! string. Without a format, entries are YAML, except unkeyed entries inside
//! an open list, which take the list's format (`key:json:..` makes every
//! following unkeyed entry JSON).
//!
//! Parsing does no I/O. Unknown format tokens are accepted here and rejected
//! when the entry is loaded.

use log::debug;

use crate::error::ParseError;
use crate::format::Format;
use crate::node::{ContentNode, Entry, FunctionNode, ListNode};

/// Accumulates entries from arguments fed one at a time.
///
/// The only state carried between arguments is the open list (the last `..`
/// or `...` entry, until a keyed argument closes it) and which argument, if
/// any, already reads stdin.
#[derive(Debug, Default)]
pub struct ContextParser {
    entries: Vec<Entry>,
    open_list: Option<usize>,
    stdin_argument: Option<String>,
}

impl ContextParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one argument and add it to the entries.
    pub fn push(&mut self, argument: &str) -> Result<(), ParseError> {
        let (key, source) = split_key(argument)?;
        if key.is_some() {
            self.open_list = None;
        }

        let (format, data) = match key {
            Some(_) => split_format(source),
            None => (None, source),
        };
        if data.is_empty() {
            return Err(ParseError::EmptyEntry(argument.to_string()));
        }
        let format = match (format, self.open_list()) {
            (Some(format), _) => format,
            (None, Some(list)) => list.child_format.clone(),
            (None, None) => Format::default(),
        };

        let node = classify(argument, data, format)?;
        if let ContentNode::Stdin { .. } = node {
            if let Some(previous) = &self.stdin_argument {
                return Err(ParseError::RepeatedStdin {
                    argument: argument.to_string(),
                    previous: previous.clone(),
                });
            }
            self.stdin_argument = Some(argument.to_string());
        }

        let entry = Entry::new(argument, key.map(str::to_string), node);
        debug!("parsed `{}` as {} entry", argument, entry.node.kind());
        match entry.node {
            ContentNode::List(_) => {
                self.entries.push(entry);
                self.open_list = Some(self.entries.len() - 1);
            }
            ContentNode::Function(_) => self.entries.push(entry),
            ContentNode::File { .. } | ContentNode::Stdin { .. } | ContentNode::Text { .. } => {
                match self.open_list_mut() {
                    Some(list) => list.entries.push(entry),
                    None => self.entries.push(entry),
                }
            }
        }
        Ok(())
    }

    /// The top-level entries parsed so far.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn finish(self) -> Vec<Entry> {
        self.entries
    }

    fn open_list(&self) -> Option<&ListNode> {
        match &self.entries.get(self.open_list?)?.node {
            ContentNode::List(list) => Some(list),
            _ => None,
        }
    }

    fn open_list_mut(&mut self) -> Option<&mut ListNode> {
        match &mut self.entries.get_mut(self.open_list?)?.node {
            ContentNode::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Parse a whole argument list.
pub fn parse_arguments<I, S>(arguments: I) -> Result<Vec<Entry>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = ContextParser::new();
    for argument in arguments {
        parser.push(argument.as_ref())?;
    }
    Ok(parser.finish())
}

/// Split `key:source`. A leading `+` means inline content, never a key, so inline
/// YAML/JSON can contain colons.
fn split_key(argument: &str) -> Result<(Option<&str>, &str), ParseError> {
    if argument.starts_with('+') {
        return Ok((None, argument));
    }
    match argument.split_once(':') {
        None => Ok((None, argument)),
        Some(("", _)) => Err(ParseError::EmptyKey(argument.to_string())),
        Some((key, source)) => Ok((Some(key), source)),
    }
}

/// Split `format:data` from the part after the key.
fn split_format(source: &str) -> (Option<Format>, &str) {
    if source.starts_with('+') {
        return (None, source);
    }
    match source.split_once(':') {
        Some((token, data)) => (Some(Format::from_token(token)), data),
        None => (None, source),
    }
}

fn classify(argument: &str, data: &str, format: Format) -> Result<ContentNode, ParseError> {
    let node = if data == ".." {
        ContentNode::List(ListNode::new(format, false))
    } else if data == "..." {
        ContentNode::List(ListNode::new(format, true))
    } else if let Some(text) = data.strip_prefix('+') {
        ContentNode::Text {
            text: text.to_string(),
            format,
        }
    } else if data == "-" {
        ContentNode::Stdin { format }
    } else if let Some(command) = data.strip_prefix("--") {
        function(argument, command, &format, true)?
    } else if let Some(command) = data.strip_prefix('-') {
        function(argument, command, &format, false)?
    } else {
        ContentNode::File {
            filename: data.into(),
            format,
        }
    };
    Ok(node)
}

fn function(
    argument: &str,
    command: &str,
    format: &Format,
    raw_output: bool,
) -> Result<ContentNode, ParseError> {
    if command.is_empty() || command.starts_with(' ') {
        return Err(ParseError::EmptyCommand(argument.to_string()));
    }
    Ok(ContentNode::Function(FunctionNode {
        command: command.to_string(),
        raw_input: format.is_raw(),
        raw_output,
    }))
}
