//! Template renderer used for `@template` files.
//! Renders template files with MiniJinja, exposing the execution context's
//! functions as globals.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use minijinja::{context, AutoEscape, Environment, Value};

use crate::error::{Error, Result};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the template file at `template` with `functions` callable from it.
    ///
    /// # Arguments
    /// * `template` - Path of the template file
    /// * `functions` - Name to callable mapping exposed to the template
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template text
    fn render(&self, template: &Path, functions: &IndexMap<String, Value>) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer that keeps trailing newlines intact.
    /// Output is never escaped, whatever the template's extension.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// # Errors
    /// * `Error::FileSystemError` if the template cannot be read
    /// * `Error::MinijinjaError` if:
    ///   - Template addition fails
    ///   - Template retrieval fails
    ///   - Template rendering fails
    fn render(&self, template: &Path, functions: &IndexMap<String, Value>) -> Result<String> {
        let source =
            fs::read_to_string(template).map_err(|e| Error::fs("read template", template, e))?;

        let mut env = self.env.clone();
        for (name, function) in functions {
            env.add_global(name.clone(), function.clone());
        }

        let name = template.display().to_string();
        env.add_template_owned(name.clone(), source).map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template(&name).map_err(Error::MinijinjaError)?;

        tmpl.render(context! {}).map_err(Error::MinijinjaError)
    }
}
