//! Template document stream.

use serde::Deserialize;
use serde_json::Value as Json;

use ctxweave_input::format::yaml_to_json;

use crate::error::RenderError;

/// Splits a template source into its YAML documents.
///
/// Every document is converted to JSON-compatible data: mapping keys become
/// strings and tags are dropped. A source with nothing but blank lines and
/// comments has no documents.
pub fn parse_documents(source: &str) -> Result<Vec<Json>, RenderError> {
    let mut documents = Vec::new();
    if !has_content(source) {
        log::debug!("template has no documents");
        return Ok(documents);
    }
    for document in serde_yaml::Deserializer::from_str(source) {
        let value = serde_yaml::Value::deserialize(document)?;
        documents.push(yaml_to_json(value));
    }
    log::debug!("template has {} document(s)", documents.len());
    Ok(documents)
}

fn has_content(source: &str) -> bool {
    source.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}
