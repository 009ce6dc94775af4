//! `%(name)` substitution over raw tree source, run before lexing.

use std::borrow::Cow;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::debug;
use regex::{Captures, Regex};

use crate::error::{Error, Result};

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%\(([^)]*)\)").expect("variable pattern is valid"))
}

/// Expands every `%(name)` in `source` from `vars`.
///
/// Surrounding spaces and tabs inside the parentheses are ignored. Replacement
/// text is never scanned again. With `permissive` set, references to unknown
/// variables stay in the output untouched; otherwise they are an error. The
/// empty pattern `%()` is always an error.
pub fn preprocess<'a>(
    source: &'a str,
    vars: &IndexMap<String, String>,
    permissive: bool,
) -> Result<Cow<'a, str>> {
    let mut failure = None;
    let output = pattern().replace_all(source, |caps: &Captures| {
        let pattern = &caps[0];
        if failure.is_some() {
            return pattern.to_string();
        }
        if pattern == "%()" {
            failure = Some(Error::EmptyVariablePattern);
            return String::new();
        }
        let name = caps[1].trim_matches(|c| c == ' ' || c == '\t');
        match vars.get(name) {
            Some(value) => value.clone(),
            None if permissive => {
                debug!("Leaving undefined variable {:?} unexpanded", name);
                pattern.to_string()
            }
            None => {
                failure = Some(Error::UndefinedVariable(name.to_string()));
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(output),
    }
}
