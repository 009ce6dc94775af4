use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use minijinja::Value;
use mktree::builtins::file_exists;
use mktree::context::ExecutionContext;
use mktree::renderer::{MiniJinjaRenderer, TemplateRenderer};
use tempfile::TempDir;

#[test]
fn test_source_root_from_file() {
    let ctx = ExecutionContext::for_source_file("templates/layout.tree");
    assert_eq!(ctx.source_root(), Path::new("templates"));
    assert_eq!(ctx.resolve_template(Path::new("a.tmpl")), PathBuf::from("templates/a.tmpl"));

    let ctx = ExecutionContext::for_source_file("layout.tree");
    assert_eq!(ctx.source_root(), Path::new("."));
}

#[test]
fn test_builtins_are_registered() {
    let ctx = ExecutionContext::new(".").with_builtins(&IndexMap::new());
    for name in [
        "file_exists",
        "file_contents",
        "now",
        "user",
        "var",
        "snake_case",
        "kebab_case",
        "camel_case",
        "pascal_case",
    ] {
        assert!(ctx.function(name).is_some(), "missing builtin {}", name);
    }
}

#[test]
fn test_later_registrations_override_builtins() {
    let ctx = ExecutionContext::new(".")
        .with_builtins(&IndexMap::new())
        .with_function("now", Value::from_function(|| "2022-03-01".to_string()));

    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("now.tmpl");
    std::fs::write(&template, "{{ now() }}").unwrap();

    let rendered = MiniJinjaRenderer::new().render(&template, ctx.functions()).unwrap();
    assert_eq!(rendered, "2022-03-01");
}

#[test]
fn test_file_exists() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("present.txt");
    std::fs::write(&file, "x").unwrap();

    assert!(file_exists(file.display().to_string()));
    assert!(!file_exists(temp_dir.path().display().to_string()));
    assert!(!file_exists(temp_dir.path().join("absent").display().to_string()));
}
