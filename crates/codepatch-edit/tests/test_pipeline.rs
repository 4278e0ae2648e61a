//! End-to-end tests for the pipeline: operations in, results out.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracing_subscriber::fmt::writer::MakeWriter;

use codepatch_edit::{
    EditError, FileAction, PatchOperation, PatchResult, Pipeline, Strategy, StrategyRegistry,
    Target,
};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    File::create(&path)
        .expect("Create file")
        .write_all(content.as_bytes())
        .expect("Write content");
    path
}

#[derive(Clone, Default)]
struct SharedLogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedLogBuffer {
    fn as_string(&self) -> String {
        match self.inner.lock() {
            Ok(guard) => String::from_utf8_lossy(&guard).to_string(),
            Err(_) => String::new(),
        }
    }
}

struct SharedLogWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut guard) = self.inner.lock() {
            guard.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            Err(io::Error::other("failed to lock shared log buffer"))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_pipeline_logs_structured_merge_event() {
    let logs = SharedLogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(
        &dir,
        "widgets.py",
        "class Widget:\n    def a(self):\n        return 1\n",
    );
    let op = PatchOperation::file(
        &path,
        Some("Widget".into()),
        "class Widget:\n    def a(self):\n        return 2\n",
    );
    let results = Pipeline::default().run(vec![op]);
    assert!(!results[0].has_errors());

    let output = logs.as_string();
    assert!(output.contains("merging class"), "{output}");
    assert!(output.contains("Widget"), "{output}");
}

#[test]
fn test_method_replace_end_to_end() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "shapes.py", "class Foo:\n    def bar(self): pass\n");

    let op = PatchOperation::file(
        &path,
        Some("Foo.bar".into()),
        "def bar(self):\n    return 42",
    );
    let results = Pipeline::default().run(vec![op]);

    assert_eq!(results.len(), 1);
    assert!(!results[0].has_errors());
    assert_eq!(
        results[0].current_content,
        "class Foo:\n    def bar(self):\n        return 42\n"
    );
}

#[test]
fn test_function_replace_keeps_rest_of_module() {
    let dir = TempDir::new().expect("Create temp dir");
    let source = "import os\n\n\ndef helper(x):\n    return x + 1\n\n\ndef main():\n    helper(1)\n";
    let path = write_file(&dir, "app.py", source);

    let op = PatchOperation::file(
        &path,
        Some("helper".into()),
        "def helper(x):\n    return x * 2",
    );
    let results = Pipeline::default().run(vec![op]);

    let out = &results[0].current_content;
    assert!(out.contains("import os"));
    assert!(out.contains("return x * 2"));
    assert!(out.contains("def main"));
    assert!(!out.contains("x + 1"));
}

#[test]
fn test_smart_class_merge_sets_review_flag() {
    let dir = TempDir::new().expect("Create temp dir");
    let source = "\
class Widget:
    def a(self):
        return 1

    def b(self):
        return 2

    def c(self):
        return 3
";
    let path = write_file(&dir, "widget.py", source);

    // Snippet only redefines one method; the merge keeps the others
    // and flags the result for review.
    let op = PatchOperation::file(
        &path,
        Some("Widget".into()),
        "class Widget:\n    def b(self):\n        return 20\n",
    );
    let results = Pipeline::default().run(vec![op]);

    let result = &results[0];
    assert!(result.needs_review);
    for name in ["def a", "def b", "def c"] {
        assert!(result.current_content.contains(name), "missing {name}");
    }
    assert!(result.current_content.contains("return 20"));
    assert!(!result.current_content.contains("return 2\n"));
}

#[test]
fn test_whole_file_replace_without_locator() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "config.py", "DEBUG = False\n");

    let op = PatchOperation::file(&path, None, "DEBUG = True\n");
    let results = Pipeline::default().run(vec![op]);

    assert_eq!(results[0].current_content, "DEBUG = True\n");
    assert_eq!(results[0].applied_strategies, vec!["whole_file"]);
}

#[test]
fn test_delete_method_action() {
    let dir = TempDir::new().expect("Create temp dir");
    let source = "class A:\n    def keep(self):\n        return 1\n\n    def drop(self):\n        return 2\n";
    let path = write_file(&dir, "a.py", source);

    let attrs = [("class", "A"), ("method", "drop")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let op = PatchOperation::file_action(&path, FileAction::DeleteMethod, attrs);
    let results = Pipeline::default().run(vec![op]);

    assert!(!results[0].has_errors());
    assert!(results[0].current_content.contains("def keep"));
    assert!(!results[0].current_content.contains("def drop"));
}

#[test]
fn test_move_file_empties_source_and_diff_reflects_it() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "old.py", "x = 1\n");

    let attrs = [("source", "old.py"), ("target", "new.py")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let op = PatchOperation::file_action(&path, FileAction::MoveFile, attrs);
    let results = Pipeline::default().run(vec![op]);

    assert_eq!(results[0].current_content, "");
    assert!(results[0].diff().contains("-x = 1"));
}

#[test]
fn test_javascript_function_replace() {
    let dir = TempDir::new().expect("Create temp dir");
    let source = "function greet() {\n  return \"hi\";\n}\n\nfunction other() {}\n";
    let path = write_file(&dir, "app.js", source);

    let op = PatchOperation::file(
        &path,
        Some("greet".into()),
        "function greet() {\n  return \"hello\";\n}",
    );
    let results = Pipeline::default().run(vec![op]);

    assert!(!results[0].has_errors());
    assert!(results[0].current_content.contains("hello"));
    assert!(results[0].current_content.contains("function other"));
    assert_eq!(results[0].applied_strategies, vec!["brace_element"]);
}

#[test]
fn test_unfixable_file_is_rolled_back_with_errors() {
    let dir = TempDir::new().expect("Create temp dir");
    // The pattern pass can locate `target` in this unparseable module,
    // but the file stays broken around the edit, so full-parse
    // validation rejects every attempt and the content is restored.
    let source = "def broken(:\n\ndef target(y):\n    return y\n";
    let path = write_file(&dir, "broken.py", source);

    let op = PatchOperation::file(
        &path,
        Some("target".into()),
        "def target(y):\n    return y * 2",
    );
    let results = Pipeline::default().run(vec![op]);

    let result = &results[0];
    assert!(result.has_errors());
    assert_eq!(result.current_content, source);
    assert!(result.applied_strategies.is_empty());
}

struct SabotagedStrategy;

impl Strategy for SabotagedStrategy {
    fn name(&self) -> &'static str {
        "sabotaged"
    }
    fn handles(&self, _op: &PatchOperation) -> bool {
        true
    }
    fn apply(&self, _op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        result.current_content.push_str("DAMAGE");
        Err(EditError::Strategy("always fails".into()))
    }
}

struct TargetedReplace;

impl Strategy for TargetedReplace {
    fn name(&self) -> &'static str {
        "targeted"
    }
    fn handles(&self, op: &PatchOperation) -> bool {
        matches!(op.target, Some(Target::Function { .. }))
    }
    fn apply(&self, op: &PatchOperation, result: &mut PatchResult) -> Result<(), EditError> {
        result.current_content = op.content.clone();
        Ok(())
    }
}

#[test]
fn test_failed_strategy_leaks_nothing_into_final_content() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "app.py", "def f():\n    return 1\n");

    let mut registry = StrategyRegistry::empty();
    registry.register(1, Box::new(SabotagedStrategy));
    registry.register(2, Box::new(TargetedReplace));

    let op = PatchOperation::file(&path, Some("f".into()), "def f():\n    return 2\n");
    let results = Pipeline::new(registry).run(vec![op]);

    let result = &results[0];
    assert_eq!(result.current_content, "def f():\n    return 2\n");
    assert!(!result.current_content.contains("DAMAGE"));
    assert_eq!(result.applied_strategies, vec!["targeted"]);
}

#[test]
fn test_original_content_is_never_mutated() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "app.py", "x = 1\n");

    let ops = vec![
        PatchOperation::file(&path, None, "x = 2\n"),
        PatchOperation::file(&path, None, "x = 3\n"),
    ];
    let results = Pipeline::default().run(ops);

    assert_eq!(results[0].original_content, "x = 1\n");
    assert_eq!(results[0].current_content, "x = 3\n");
    assert_eq!(
        results[0].applied_strategies,
        vec!["whole_file", "whole_file"]
    );
}

#[test]
fn test_nothing_written_back_to_disk() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = write_file(&dir, "app.py", "x = 1\n");

    let op = PatchOperation::file(&path, None, "x = 2\n");
    let _results = Pipeline::default().run(vec![op]);

    let on_disk = std::fs::read_to_string(Path::new(&path)).expect("Read file");
    assert_eq!(on_disk, "x = 1\n");
}
