use std::fs;

use indexmap::IndexMap;
use minijinja::Value;
use mktree::error::Error;
use mktree::renderer::{MiniJinjaRenderer, TemplateRenderer};
use tempfile::TempDir;

#[test]
fn test_renders_with_functions() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("greeting.tmpl");
    fs::write(&template, "Hello {{ user() }}!\n{% for i in range(2) %}{{ i }}{% endfor %}\n").unwrap();

    let mut functions = IndexMap::new();
    functions.insert("user".to_string(), Value::from_function(|| "test".to_string()));

    let rendered = MiniJinjaRenderer::new().render(&template, &functions).unwrap();
    assert_eq!(rendered, "Hello test!\n01\n");
}

#[test]
fn test_renders_expressions_without_functions() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("plain.tmpl");
    fs::write(&template, "{{ 1 + 1 }}").unwrap();

    let rendered = MiniJinjaRenderer::new().render(&template, &IndexMap::new()).unwrap();
    assert_eq!(rendered, "2");
}

#[test]
fn test_missing_template() {
    let temp_dir = TempDir::new().unwrap();
    let result = MiniJinjaRenderer::new().render(&temp_dir.path().join("nope"), &IndexMap::new());
    assert!(matches!(result, Err(Error::FileSystemError { .. })));
}

#[test]
fn test_template_errors() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("broken.tmpl");
    fs::write(&template, "{{ unknown_function() }}").unwrap();

    let result = MiniJinjaRenderer::default().render(&template, &IndexMap::new());
    assert!(matches!(result, Err(Error::MinijinjaError(_))));

    fs::write(&template, "{% if %}").unwrap();
    let result = MiniJinjaRenderer::default().render(&template, &IndexMap::new());
    assert!(matches!(result, Err(Error::MinijinjaError(_))));
}

#[test]
fn test_markup_templates_are_not_escaped() {
    let temp_dir = TempDir::new().unwrap();
    let mut functions = IndexMap::new();
    functions.insert("title".to_string(), Value::from_function(|| "Tom & Jerry <3".to_string()));

    for name in ["index.html", "feed.xml", "plain.tmpl"] {
        let template = temp_dir.path().join(name);
        fs::write(&template, "{{ title() }}").unwrap();
        let rendered = MiniJinjaRenderer::new().render(&template, &functions).unwrap();
        assert_eq!(rendered, "Tom & Jerry <3", "{}", name);
    }
}
