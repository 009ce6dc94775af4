//! Variable loading for tree sources.
//! Variables come from `KEY=VALUE` pairs on the command line and from an
//! optional variables file in JSON or YAML.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

/// Parses a `KEY=VALUE` pair. Both sides must be non-empty; the value may
/// itself contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(Error::ConfigError(format!("expected KEY=VALUE but got {:?}", s)));
    };
    if key.is_empty() {
        return Err(Error::ConfigError("key-value pair must not be empty".to_string()));
    }
    if value.is_empty() {
        return Err(Error::ConfigError(format!("missing value for variable {:?}", key)));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Loads variables from a JSON or YAML mapping of names to scalars.
///
/// # Errors
/// * `Error::FileSystemError` if the file cannot be read
/// * `Error::ConfigError` if the content is not a flat mapping of scalars
pub fn load_variables_file<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>> {
    let path = path.as_ref();
    debug!("Loading variables from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| Error::fs("read", path, e))?;
    parse_variables(&content)
}

/// Parses variables content, trying JSON first and YAML second.
pub fn parse_variables(content: &str) -> Result<IndexMap<String, String>> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid variables format: {}", e)))?,
    };

    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::ConfigError(format!(
                        "variable {:?} must be a string, number or boolean, got {}",
                        key, other
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

/// Merges file variables with command-line ones; the latter win.
pub fn merge_variables(
    file: IndexMap<String, String>,
    cli: impl IntoIterator<Item = (String, String)>,
) -> IndexMap<String, String> {
    let mut vars = file;
    vars.extend(cli);
    vars
}
