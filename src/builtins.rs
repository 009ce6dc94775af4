//! Functions every template can call unless the caller overrides them.

use std::fs;
use std::io;

use chrono::{Local, SecondsFormat};
use cruet::Inflector;
use indexmap::IndexMap;
use log::warn;
use minijinja::{Error as TemplateError, ErrorKind, Value};

/// The builtin functions, keyed by the name templates call them with.
pub fn functions(variables: &IndexMap<String, String>) -> Vec<(&'static str, Value)> {
    let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let user = current_user();
    let variables = variables.clone();

    vec![
        ("file_exists", Value::from_function(file_exists)),
        ("file_contents", Value::from_function(file_contents)),
        ("now", Value::from_function(move || now.clone())),
        ("user", Value::from_function(move || user.clone())),
        (
            "var",
            Value::from_function(move |name: String| -> Result<String, TemplateError> {
                variables.get(&name).cloned().ok_or_else(|| {
                    TemplateError::new(
                        ErrorKind::UndefinedError,
                        format!("variable {:?} is undefined", name),
                    )
                })
            }),
        ),
        ("snake_case", Value::from_function(|s: String| s.to_snake_case())),
        ("kebab_case", Value::from_function(|s: String| s.to_kebab_case())),
        ("camel_case", Value::from_function(|s: String| s.to_camel_case())),
        ("pascal_case", Value::from_function(|s: String| s.to_pascal_case())),
    ]
}

/// True for an existing path that is not a directory.
pub fn file_exists(path: String) -> bool {
    match fs::metadata(&path) {
        Ok(meta) => !meta.is_dir(),
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("unable to stat {}: {}", path, err);
            }
            false
        }
    }
}

pub fn file_contents(path: String) -> Result<String, TemplateError> {
    fs::read_to_string(&path).map_err(|err| {
        TemplateError::new(ErrorKind::InvalidOperation, format!("cannot read {}", path))
            .with_source(err)
    })
}

fn current_user() -> String {
    match std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
        Ok(user) => user,
        Err(_) => {
            warn!("unable to get current user");
            String::new()
        }
    }
}
