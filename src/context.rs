//! Per-run settings used while materializing a tree.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use minijinja::Value;

use crate::builtins;

/// Template functions plus the directory that template paths are relative to.
///
/// Built once per run and only lent to the materializer; it never becomes part
/// of the entity tree.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    functions: IndexMap<String, Value>,
    source_root: PathBuf,
}

impl ExecutionContext {
    pub fn new<P: Into<PathBuf>>(source_root: P) -> Self {
        Self { functions: IndexMap::new(), source_root: source_root.into() }
    }

    /// Context for the tree source at `path`: templates resolve next to it.
    pub fn for_source_file<P: AsRef<Path>>(path: P) -> Self {
        let source_root = match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::new(source_root)
    }

    /// Registers a callable under `name`, replacing any earlier registration.
    ///
    /// ```
    /// use minijinja::Value;
    /// use mktree::context::ExecutionContext;
    ///
    /// let ctx = ExecutionContext::new(".")
    ///     .with_function("greet", Value::from_function(|name: String| format!("hi {name}")));
    /// assert!(ctx.function("greet").is_some());
    /// ```
    pub fn with_function<N: Into<String>>(mut self, name: N, function: Value) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// Registers the default functions. Call this before registering your own
    /// so they can override the builtins.
    pub fn with_builtins(mut self, variables: &IndexMap<String, String>) -> Self {
        for (name, function) in builtins::functions(variables) {
            self.functions.insert(name.to_string(), function);
        }
        self
    }

    pub fn function(&self, name: &str) -> Option<&Value> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> &IndexMap<String, Value> {
        &self.functions
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Where the template at `template` lives on disk.
    pub fn resolve_template(&self, template: &Path) -> PathBuf {
        self.source_root.join(template)
    }
}
