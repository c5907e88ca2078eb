//! Conversion of a built context into MiniJinja values.
//!
//! Data entries map onto plain MiniJinja values. Function entries become
//! callables taking `(args, stdin)`: `args` must be a sequence of strings that
//! is appended to the command line, and `stdin` is whatever value the template
//! wants to feed the command.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ctxweave_input::{Context, ContextValue, FunctionBridge};
use minijinja::value::{from_args, Object, ObjectRepr};
use minijinja::{Error, ErrorKind, State, Value};

/// Converts a whole context into the root value templates are evaluated with.
pub fn context_value(context: &Context) -> Value {
    let map: BTreeMap<String, Value> = context
        .iter()
        .map(|(key, value)| (key.clone(), template_value(value)))
        .collect();
    Value::from(map)
}

/// Converts a single context value.
pub fn template_value(value: &ContextValue) -> Value {
    match value {
        ContextValue::Null => Value::from(()),
        ContextValue::Bool(b) => Value::from(*b),
        ContextValue::Number(n) => number_value(n),
        ContextValue::String(s) => Value::from(s.as_str()),
        ContextValue::Sequence(items) => {
            Value::from(items.iter().map(template_value).collect::<Vec<_>>())
        }
        ContextValue::Mapping(mapping) => {
            let map: BTreeMap<String, Value> = mapping
                .iter()
                .map(|(key, value)| (key.clone(), template_value(value)))
                .collect();
            Value::from(map)
        }
        ContextValue::Function(bridge) => function_value(bridge.clone()),
    }
}

fn number_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        Value::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Wraps a function bridge as a template callable.
///
/// A failing call surfaces as an `InvalidOperation` error whose source is the
/// underlying [`ctxweave_input::CallError`]. Printed without being called, the
/// value shows as `<function `cmd`>`.
pub fn function_value(bridge: FunctionBridge) -> Value {
    Value::from_object(TemplateFunction(bridge))
}

#[derive(Debug)]
struct TemplateFunction(FunctionBridge);

impl Object for TemplateFunction {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(self: &Arc<Self>, _state: &State<'_, '_>, args: &[Value]) -> Result<Value, Error> {
        let (args, stdin): (Vec<Value>, Value) = from_args(args)?;
        let args = args.iter().map(json_value).collect::<Result<Vec<_>, _>>()?;
        let stdin = json_value(&stdin)?;

        let bridge = &self.0;
        log::debug!("calling context function `{}`", bridge.command());
        let output = bridge.call(&args, &stdin).map_err(|err| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("function `{}` failed: {}", bridge.command(), err),
            )
            .with_source(err)
        })?;
        Ok(Value::from_serialize(&output))
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function `{}`>", self.0.command())
    }
}

/// Converts an evaluated template value back into plain JSON data.
pub fn json_value(value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(
            ErrorKind::BadSerialization,
            format!("cannot convert `{}` to data", value),
        )
        .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_of(value: serde_json::Value) -> Context {
        match ContextValue::from(value) {
            ContextValue::Mapping(m) => m,
            other => panic!("expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_data_values_round_trip_through_template_values() {
        let context = context_of(json!({
            "name": "widget",
            "count": 3,
            "ratio": 0.5,
            "on": true,
            "nothing": null,
            "tags": ["a", "b"],
            "nested": {"deep": {"x": 1}}
        }));

        let value = context_value(&context);
        let back = json_value(&value).unwrap();
        assert_eq!(
            back,
            json!({
                "name": "widget",
                "count": 3,
                "ratio": 0.5,
                "on": true,
                "nothing": null,
                "tags": ["a", "b"],
                "nested": {"deep": {"x": 1}}
            })
        );
    }

    #[test]
    fn test_nested_lookup() {
        let context = context_of(json!({"a": {"b": [10, 20]}}));
        let value = context_value(&context);
        let item = value
            .get_attr("a")
            .unwrap()
            .get_attr("b")
            .unwrap()
            .get_item(&Value::from(1))
            .unwrap();
        assert_eq!(json_value(&item).unwrap(), json!(20));
    }

    #[cfg(unix)]
    #[test]
    fn test_function_value_is_callable() {
        let mut env = minijinja::Environment::new();
        env.add_global("upper", function_value(FunctionBridge::new("tr a-z A-Z", true, true)));
        let out = env.render_str("{{ upper([], 'shout') }}", ()).unwrap();
        assert_eq!(out, "SHOUT");
    }

    #[test]
    fn test_uncalled_function_shows_placeholder() {
        let value = function_value(FunctionBridge::new("tr a-z A-Z", true, true));
        assert_eq!(json_value(&value).unwrap(), json!("<function `tr a-z A-Z`>"));

        let mut env = minijinja::Environment::new();
        env.add_global("upper", value);
        let out = env.render_str("{{ upper }}", ()).unwrap();
        assert_eq!(out, "<function `tr a-z A-Z`>");
    }

    #[cfg(unix)]
    #[test]
    fn test_function_failure_keeps_call_error_as_source() {
        use std::error::Error as _;

        let mut env = minijinja::Environment::new();
        env.add_global("upper", function_value(FunctionBridge::new("tr a-z A-Z", true, true)));
        let err = env.render_str("{{ upper([1], 'x') }}", ()).unwrap_err();

        let mut source = err.source();
        let mut found = false;
        while let Some(cause) = source {
            if cause.downcast_ref::<ctxweave_input::CallError>().is_some() {
                found = true;
                break;
            }
            source = cause.source();
        }
        assert!(found, "CallError not in source chain: {:?}", err);
    }
}
