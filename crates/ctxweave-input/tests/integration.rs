//! Integration tests for ctxweave-input.
//!
//! These build whole contexts from argument lists, touching real files and
//! (on Unix) real commands, with stdin mocked.

use std::io::Write;
use std::path::Path;

use ctxweave_input::{
    CallError, ContextBuilder, ContextError, ContextValue, MergeStrategy, MockStdin, ParseError,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.display().to_string()
}

fn build_with(builder: ContextBuilder, args: &[&str]) -> Value {
    serde_json::to_value(builder.build_from_args(args).unwrap()).unwrap()
}

fn build(args: &[&str]) -> Value {
    build_with(ContextBuilder::new().with_stdin(MockStdin::terminal()), args)
}

// ============================================================================
// Files and merging
// ============================================================================

#[test]
fn full_context_from_file() {
    let dir = TempDir::new().unwrap();
    let ctx = write(dir.path(), "ctx.json", r#"{"x": "foo"}"#);
    assert_eq!(build(&[ctx.as_str()]), json!({"x": "foo"}));
}

#[test]
fn merge_context_from_multiple_files() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.json", r#"{"x": "foo", "y": "bar"}"#);
    let b = write(dir.path(), "b.yaml", "x: foobar\n");
    assert_eq!(build(&[a.as_str(), b.as_str()]), json!({"x": "foobar", "y": "bar"}));
}

#[test]
fn raw_text_in_file() {
    let dir = TempDir::new().unwrap();
    let notes = write(dir.path(), "notes.txt", "foo");
    assert_eq!(build(&[format!("x::{}", notes).as_str()]), json!({"x": "foo"}));
}

#[test]
fn kv_file() {
    let dir = TempDir::new().unwrap();
    let env = write(dir.path(), "env.kv", "HOST example.org\nPORT 8080\n");
    assert_eq!(
        build(&[format!("env:kv:{}", env).as_str()]),
        json!({"env": {"HOST": "example.org", "PORT": "8080"}})
    );
}

#[test]
fn deep_and_shallow_merge() {
    let args = ["+{a: {x: 1}}", "+{a: {y: 2}}"];
    assert_eq!(build(&args), json!({"a": {"y": 2}}));
    assert_eq!(
        build_with(ContextBuilder::new().merge(MergeStrategy::Deep), &args),
        json!({"a": {"x": 1, "y": 2}})
    );
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn metadata_list_mixes_files_and_inline() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "first.post.md", "Hello");
    let second = write(dir.path(), "second.md", "World");

    let context = build(&["posts::...", first.as_str(), second.as_str(), "+inline", "title::+Blog"]);
    assert_eq!(
        context,
        json!({
            "posts": [
                {"content": "Hello", "filename": first, "basename": "first.post.md", "name": "first.post"},
                {"content": "World", "filename": second, "basename": "second.md", "name": "second"},
                {"content": "inline"},
            ],
            "title": "Blog",
        })
    );
}

#[test]
fn list_children_use_list_format() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.json", r#"{"n": 1}"#);
    let context = build(&["xs:json:..", a.as_str(), "+[2]"]);
    assert_eq!(context, json!({"xs": [{"n": 1}, [2]]}));
}

// ============================================================================
// Stdin
// ============================================================================

#[test]
fn stdin_once() {
    let context = build_with(
        ContextBuilder::new().with_stdin(MockStdin::piped("a: 1\n")),
        &["in:-", "raw::+x"],
    );
    assert_eq!(context, json!({"in": {"a": 1}, "raw": "x"}));
}

#[test]
fn stdin_twice_is_rejected_before_reading() {
    let err = ContextBuilder::new()
        .with_stdin(MockStdin::piped("a: 1\n"))
        .build_from_args(["-", "again::-"])
        .unwrap_err();
    assert!(matches!(
        err,
        ContextError::Parse(ParseError::RepeatedStdin { .. })
    ));
}

// ============================================================================
// Functions
// ============================================================================

fn function(context: &ctxweave_input::Context, key: &str) -> ctxweave_input::FunctionBridge {
    match &context[key] {
        ContextValue::Function(f) => f.clone(),
        other => panic!("expected function under {}, got {:?}", key, other),
    }
}

#[cfg(unix)]
#[test]
fn raw_function_uppercases() {
    let context = ContextBuilder::new()
        .build_from_args(["upper::--tr a-z A-Z"])
        .unwrap();
    let upper = function(&context, "upper");
    assert_eq!(upper.call(&[], &json!("abc")).unwrap(), json!("ABC"));
}

#[cfg(unix)]
#[test]
fn structured_output_function_decodes() {
    let context = ContextBuilder::new()
        .build_from_args(["parse::-cat"])
        .unwrap();
    let parse = function(&context, "parse");
    assert_eq!(
        parse.call(&[], &json!("{\"a\": {\"b\": [1]}}")).unwrap(),
        json!({"a": {"b": [1]}})
    );
}

#[cfg(unix)]
#[test]
fn non_string_call_argument_fails() {
    let context = ContextBuilder::new()
        .build_from_args(["f:--echo"])
        .unwrap();
    let f = function(&context, "f");
    let err = f.call(&[json!({"not": "a string"})], &json!(null)).unwrap_err();
    assert!(matches!(err, CallError::NonStringArgument(_)));
}
