//! Ordered collection of language diagnostics.
//!
//! The lexer and parser keep going after an error so that a single run reports
//! every problem it can find. Each diagnostic is logged as it is recorded, and
//! the first one becomes the error handed back to the caller.

use log::warn;

use crate::error::{Diagnostic, Error, Result};

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", Error::from(diagnostic.clone()));
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.items.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns `value` if nothing was recorded, otherwise the first diagnostic.
    pub fn into_result<T>(self, value: T) -> Result<T> {
        match self.items.into_iter().next() {
            Some(first) => Err(first.into()),
            None => Ok(value),
        }
    }
}
