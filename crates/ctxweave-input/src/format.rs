//! Content formats and their decoders.

use std::fmt;

use crate::error::LoadError;
use crate::value::{ContextValue, Mapping};

/// How loaded bytes are turned into a value.
///
/// The format token written in an argument is kept even when it names nothing
/// we know ([`Format::Unknown`]) so that a bad token only fails when that entry
/// is actually loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML, which also accepts JSON. The default.
    #[default]
    Yaml,
    Json,
    /// `key value` lines.
    Kv,
    /// No decoding: the payload is passed through as a string.
    Text,
    Unknown(String),
}

impl Format {
    /// Interpret the token between the colons of `key:token:data`.
    ///
    /// An empty token means [`Format::Text`], which is what makes `key::data`
    /// the short form of a raw entry.
    pub fn from_token(token: &str) -> Self {
        match token {
            "" | "text" => Format::Text,
            "yaml" => Format::Yaml,
            "json" => Format::Json,
            "kv" => Format::Kv,
            other => Format::Unknown(other.to_string()),
        }
    }

    /// Raw entries keep their payload as text.
    pub fn is_raw(&self) -> bool {
        matches!(self, Format::Text)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<ContextValue, LoadError> {
        match self {
            Format::Yaml => Ok(decode_yaml(bytes)?.into()),
            Format::Json => Ok(serde_json::from_slice::<serde_json::Value>(bytes)?.into()),
            Format::Kv => decode_kv(bytes),
            Format::Text => Ok(ContextValue::String(
                String::from_utf8_lossy(bytes).into_owned(),
            )),
            Format::Unknown(token) => Err(LoadError::UnsupportedFormat(token.clone())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
            Format::Kv => write!(f, "kv"),
            Format::Text => write!(f, "text"),
            Format::Unknown(token) => write!(f, "{}", token),
        }
    }
}

/// Decode YAML (or JSON) into JSON-compatible types.
///
/// Empty input is null. Mapping keys that are not strings are stringified and
/// YAML tags are dropped, so everything downstream only deals with JSON shapes.
pub fn decode_yaml(bytes: &[u8]) -> Result<serde_json::Value, LoadError> {
    let value: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
    Ok(yaml_to_json(value))
}

/// Convert a YAML value into the equivalent JSON value.
pub fn yaml_to_json(value: serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Json::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (key_to_string(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_json::to_string(&yaml_to_json(other)).unwrap_or_default(),
    }
}

fn decode_kv(bytes: &[u8]) -> Result<ContextValue, LoadError> {
    let text = String::from_utf8(bytes.to_vec())?;
    let mut mapping = Mapping::new();
    for line in text.split('\n') {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(' ')
            .ok_or_else(|| LoadError::KvLine(line.to_string()))?;
        mapping.insert(key.to_string(), ContextValue::String(value.to_string()));
    }
    Ok(ContextValue::Mapping(mapping))
}
