//! Combining top-level mappings into one context.

use crate::value::{ContextValue, Mapping};

/// How a later mapping is combined with what came before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Later top-level keys replace earlier ones wholesale.
    #[default]
    Shallow,
    /// Nested mappings are merged key by key; anything else (scalars,
    /// sequences, functions) is replaced by the later value.
    Deep,
}

impl MergeStrategy {
    pub fn apply(self, target: &mut Mapping, source: Mapping) {
        match self {
            MergeStrategy::Shallow => merge_shallow(target, source),
            MergeStrategy::Deep => merge_deep(target, source),
        }
    }
}

pub fn merge_shallow(target: &mut Mapping, source: Mapping) {
    target.extend(source);
}

pub fn merge_deep(target: &mut Mapping, source: Mapping) {
    for (key, incoming) in source {
        match target.get_mut(&key) {
            Some(ContextValue::Mapping(existing)) if incoming.is_mapping() => {
                if let ContextValue::Mapping(incoming) = incoming {
                    merge_deep(existing, incoming);
                }
            }
            _ => {
                target.insert(key, incoming);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: serde_json::Value) -> Mapping {
        match ContextValue::from(value) {
            ContextValue::Mapping(m) => m,
            other => panic!("not a mapping: {:?}", other),
        }
    }

    fn merged(strategy: MergeStrategy, layers: &[serde_json::Value]) -> serde_json::Value {
        let mut target = Mapping::new();
        for layer in layers {
            strategy.apply(&mut target, mapping(layer.clone()));
        }
        serde_json::to_value(target).unwrap()
    }

    #[test]
    fn test_shallow_replaces_nested() {
        assert_eq!(
            merged(MergeStrategy::Shallow, &[json!({"a": {"x": 1}}), json!({"a": {"y": 2}})]),
            json!({"a": {"y": 2}})
        );
    }

    #[test]
    fn test_deep_merges_nested() {
        assert_eq!(
            merged(MergeStrategy::Deep, &[json!({"a": {"x": 1}}), json!({"a": {"y": 2}})]),
            json!({"a": {"x": 1, "y": 2}})
        );
    }

    #[test]
    fn test_deep_later_leaf_wins() {
        assert_eq!(
            merged(
                MergeStrategy::Deep,
                &[json!({"a": {"x": 1, "k": {"z": 0}}}), json!({"a": {"x": 2, "k": "flat"}})]
            ),
            json!({"a": {"x": 2, "k": "flat"}})
        );
    }

    #[test]
    fn test_deep_replaces_sequences_whole() {
        assert_eq!(
            merged(MergeStrategy::Deep, &[json!({"a": [1, 2, 3]}), json!({"a": [9]})]),
            json!({"a": [9]})
        );
    }

    #[test]
    fn test_deep_mapping_over_scalar() {
        assert_eq!(
            merged(MergeStrategy::Deep, &[json!({"a": 1}), json!({"a": {"b": 2}})]),
            json!({"a": {"b": 2}})
        );
    }

    #[test]
    fn test_default_is_shallow() {
        assert_eq!(MergeStrategy::default(), MergeStrategy::Shallow);
    }
}
