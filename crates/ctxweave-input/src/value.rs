//! Values produced by evaluating context entries.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::function::FunctionBridge;

/// String-keyed mapping, the shape of the final context.
pub type Mapping = BTreeMap<String, ContextValue>;

/// A template-ready value.
///
/// This is JSON's data model plus [`ContextValue::Function`], a callable backed
/// by an external command. Functions only become callable once handed to a
/// template engine; serializing one yields a `<function ...>` placeholder string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContextValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Sequence(Vec<ContextValue>),
    Mapping(Mapping),
    Function(FunctionBridge),
}

impl ContextValue {
    /// Short name of the value's type, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ContextValue::Null => "null",
            ContextValue::Bool(_) => "boolean",
            ContextValue::Number(_) => "number",
            ContextValue::String(_) => "string",
            ContextValue::Sequence(_) => "sequence",
            ContextValue::Mapping(_) => "mapping",
            ContextValue::Function(_) => "function",
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ContextValue::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ContextValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ContextValue]> {
        match self {
            ContextValue::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Look up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.as_mapping()?.get(key)
    }

    /// Wrap as the single-entry mapping `{key: self}`.
    pub fn keyed(self, key: impl Into<String>) -> ContextValue {
        let mut mapping = Mapping::new();
        mapping.insert(key.into(), self);
        ContextValue::Mapping(mapping)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(b),
            Value::Number(n) => ContextValue::Number(n),
            Value::String(s) => ContextValue::String(s),
            Value::Array(items) => {
                ContextValue::Sequence(items.into_iter().map(ContextValue::from).collect())
            }
            Value::Object(map) => ContextValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ContextValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<Mapping> for ContextValue {
    fn from(mapping: Mapping) -> Self {
        ContextValue::Mapping(mapping)
    }
}

impl From<FunctionBridge> for ContextValue {
    fn from(function: FunctionBridge) -> Self {
        ContextValue::Function(function)
    }
}

impl Serialize for ContextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContextValue::Null => serializer.serialize_unit(),
            ContextValue::Bool(b) => serializer.serialize_bool(*b),
            ContextValue::Number(n) => n.serialize(serializer),
            ContextValue::String(s) => serializer.serialize_str(s),
            ContextValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContextValue::Mapping(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (k, v) in mapping {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            ContextValue::Function(function) => {
                serializer.serialize_str(&format!("<function `{}`>", function.command()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_round_trips_through_serialize() {
        let source = json!({"a": [1, "two", null, {"b": true}], "c": 1.5});
        let value = ContextValue::from(source.clone());
        assert_eq!(serde_json::to_value(&value).unwrap(), source);
    }

    #[test]
    fn test_keyed_wraps_value() {
        let value = ContextValue::from("foo").keyed("x");
        assert_eq!(value.get("x").and_then(ContextValue::as_str), Some("foo"));
        assert!(value.is_mapping());
    }

    #[test]
    fn test_function_serializes_as_placeholder() {
        let value = ContextValue::Function(FunctionBridge::new("base64 -d", true, true));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!("<function `base64 -d`>")
        );
        assert_eq!(value.kind(), "function");
    }
}
