//! Output encodings for rendered documents.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as Json;

use crate::error::RenderError;

/// Default JSON indentation.
pub const DEFAULT_INDENT: usize = 2;

/// How rendered documents are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON, indented by `indent` spaces and newline-terminated.
    /// An indent of zero writes compact JSON with no trailing newline.
    Json { indent: usize },
    /// YAML, documents separated by `---`.
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json {
            indent: DEFAULT_INDENT,
        }
    }
}

impl OutputFormat {
    /// Encodes the documents in order into one output string.
    pub fn encode_all(&self, documents: &[Json]) -> Result<String, RenderError> {
        let mut out = String::new();
        for (index, document) in documents.iter().enumerate() {
            out.push_str(&self.encode(document, index)?);
        }
        Ok(out)
    }

    /// Encodes one document; `index` is its position in the output stream.
    pub fn encode(&self, document: &Json, index: usize) -> Result<String, RenderError> {
        match self {
            OutputFormat::Json { indent: 0 } => Ok(serde_json::to_string(document)?),
            OutputFormat::Json { indent } => {
                let indent = " ".repeat(*indent);
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                document.serialize(&mut serializer)?;
                buf.push(b'\n');
                String::from_utf8(buf)
                    .map_err(|err| RenderError::SerializationError(err.to_string()))
            }
            OutputFormat::Yaml => {
                let body = serde_yaml::to_string(document)
                    .map_err(|err| RenderError::SerializationError(err.to_string()))?;
                if index == 0 {
                    Ok(body)
                } else {
                    Ok(format!("---\n{}", body))
                }
            }
        }
    }
}
