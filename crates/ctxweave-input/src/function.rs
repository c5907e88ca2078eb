//! Exposing an external command as a callable context value.

use std::time::Duration;

use ctxweave_pipe::CommandLine;
use log::debug;
use serde_json::Value;

use crate::error::CallError;
use crate::format::decode_yaml;

/// A context function backed by an external command.
///
/// Calls take a list of string arguments, appended to the command's argv, and
/// one stdin payload:
///
/// | `raw_input` | stdin sent to the process              |
/// |-------------|----------------------------------------|
/// | `true`      | the payload, which must be a string    |
/// | `false`     | the payload serialized as compact JSON |
///
/// | `raw_output` | call returns                          |
/// |--------------|---------------------------------------|
/// | `true`       | stdout as a string                    |
/// | `false`      | stdout decoded as YAML/JSON           |
///
/// Every call spawns a fresh process; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBridge {
    command: CommandLine,
    raw_input: bool,
    raw_output: bool,
}

impl FunctionBridge {
    pub fn new(command: &str, raw_input: bool, raw_output: bool) -> Self {
        Self {
            command: CommandLine::parse(command),
            raw_input,
            raw_output,
        }
    }

    /// Kill the command if a call runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command = self.command.with_timeout(timeout);
        self
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    pub fn raw_input(&self) -> bool {
        self.raw_input
    }

    pub fn raw_output(&self) -> bool {
        self.raw_output
    }

    /// Run the command once.
    pub fn call(&self, args: &[Value], stdin: &Value) -> Result<Value, CallError> {
        let args = args
            .iter()
            .map(|arg| match arg {
                Value::String(s) => Ok(s.clone()),
                other => Err(CallError::NonStringArgument(describe(other))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let input = if self.raw_input {
            match stdin {
                Value::String(s) => s.as_bytes().to_vec(),
                other => {
                    return Err(CallError::NonStringInput(
                        self.command.to_string(),
                        describe(other),
                    ))
                }
            }
        } else {
            serde_json::to_vec(stdin).map_err(CallError::EncodeInput)?
        };

        let command = self.command.clone().with_args(args);
        debug!("calling function `{}`", command);
        let output = command.run(&input).map_err(|source| CallError::Process {
            command: command.to_string(),
            source,
        })?;

        if self.raw_output {
            Ok(Value::String(String::from_utf8_lossy(&output).into_owned()))
        } else {
            decode_yaml(&output).map_err(|source| CallError::DecodeOutput {
                command: command.to_string(),
                source,
            })
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "a sequence".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_in_raw_out() {
        let f = FunctionBridge::new("tr a-z A-Z", true, true);
        assert_eq!(f.call(&[], &json!("abc")).unwrap(), json!("ABC"));
    }

    #[test]
    fn test_raw_in_structured_out() {
        let f = FunctionBridge::new("cat", true, false);
        let out = f.call(&[], &json!("a: {b: [1, 2]}")).unwrap();
        assert_eq!(out, json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn test_structured_in_raw_out() {
        let f = FunctionBridge::new("cat", false, true);
        let out = f.call(&[], &json!({"b": 2, "a": [1]})).unwrap();
        assert_eq!(out, json!(r#"{"a":[1],"b":2}"#));
    }

    #[test]
    fn test_structured_in_structured_out() {
        let f = FunctionBridge::new("cat", false, false);
        let out = f.call(&[], &json!({"nested": {"x": 1}})).unwrap();
        assert_eq!(out, json!({"nested": {"x": 1}}));
    }

    #[test]
    fn test_string_args_are_appended() {
        let f = FunctionBridge::new("printf %s-%s", true, true);
        let out = f.call(&[json!("a"), json!("b")], &json!("")).unwrap();
        assert_eq!(out, json!("a-b"));
    }

    #[test]
    fn test_non_string_argument_is_rejected() {
        let f = FunctionBridge::new("echo", true, true);
        let err = f.call(&[json!("ok"), json!(3)], &json!("")).unwrap_err();
        assert!(matches!(err, CallError::NonStringArgument(_)));
        assert!(err.to_string().contains("must be strings"));
    }

    #[test]
    fn test_raw_input_requires_string() {
        let f = FunctionBridge::new("cat", true, true);
        let err = f.call(&[], &json!({"a": 1})).unwrap_err();
        assert!(matches!(err, CallError::NonStringInput(_, _)));
    }

    #[test]
    fn test_failing_command() {
        let f = FunctionBridge::new("false", true, true);
        let err = f.call(&[], &json!("")).unwrap_err();
        assert!(matches!(err, CallError::Process { .. }));
    }

    #[test]
    fn test_undecodable_output() {
        let f = FunctionBridge::new("printf {", true, false);
        let err = f.call(&[], &json!("")).unwrap_err();
        assert!(matches!(err, CallError::DecodeOutput { .. }));
    }

    #[test]
    fn test_timeout_applies_per_call() {
        let f = FunctionBridge::new("sleep 2", true, true)
            .with_timeout(Some(Duration::from_millis(200)));
        let err = f.call(&[], &json!("")).unwrap_err();
        assert!(matches!(
            err,
            CallError::Process {
                source: ctxweave_pipe::ShellError::Timeout(..),
                ..
            }
        ));
    }
}
