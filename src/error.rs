//! Error handling for mktree.
//! Defines the error type and result alias used throughout the crate, plus the
//! source-positioned [`Diagnostic`] carried by language errors.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline stage that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Syntax,
    Parse,
    Interpret,
}

/// What went wrong at a source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("invalid keyword {0:?}")]
    UnknownKeyword(String),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid s-expression {0:?} inside {1}")]
    InvalidExpression(String, &'static str),

    #[error("expected a {0}")]
    MissingArgument(&'static str),

    #[error("{0} is not a string")]
    ExpectedString(String),

    #[error("@{attribute} expects {expected} argument(s) but got {found}")]
    ArgumentCount {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid file mode {0:?}")]
    InvalidFileMode(String),

    #[error("@contents and @template are mutually exclusive")]
    TemplateContentsConflict,

    #[error("invalid {owner} attribute {name:?}")]
    InvalidAttribute { owner: &'static str, name: String },
}

/// A language error tied to a location in the (preprocessed) source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub reason: Reason,
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// The offending line followed by a caret under the column.
    pub excerpt: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, reason: Reason, source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let (before, after) = source.split_at(offset);
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = after.find('\n').map(|i| offset + i).unwrap_or(source.len());
        let line = before.matches('\n').count() + 1;
        let column = source[line_start..offset].chars().count() + 1;
        let excerpt = format!(
            "{}\n{}^",
            source[line_start..line_end].trim_end_matches('\r'),
            "-".repeat(column - 1)
        );

        Self { stage, reason, offset, line, column, excerpt }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {} col {}:\n{}", self.reason, self.line, self.column, self.excerpt)
    }
}

impl From<Diagnostic> for Error {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.stage {
            Stage::Syntax => Error::SyntaxError(diagnostic),
            Stage::Parse => Error::ParseError(diagnostic),
            Stage::Interpret => Error::InterpretError(diagnostic),
        }
    }
}

/// Custom error types for mktree operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Lexical error in the tree source
    #[error("syntax error: {0}")]
    SyntaxError(Diagnostic),

    /// Grammatical error in the tree source
    #[error("parse error: {0}")]
    ParseError(Diagnostic),

    /// Semantic error found while building the entity tree
    #[error("interpret error: {0}")]
    InterpretError(Diagnostic),

    #[error("undefined variable: {0:?}")]
    UndefinedVariable(String),

    #[error("empty variable pattern '%()' is not allowed")]
    EmptyVariablePattern,

    #[error("cannot set reserved variable '{0}'")]
    ReservedVariable(String),

    /// The root directory cannot be bound to `root_dir`
    #[error("root directory {0:?} is not valid UTF-8")]
    InvalidRoot(PathBuf),

    /// A filesystem operation failed while materializing the tree
    #[error("failed to {operation} '{}': {source}", path.display())]
    FileSystemError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

impl Error {
    pub fn fs<P: AsRef<Path>>(operation: &'static str, path: P, source: io::Error) -> Self {
        Error::FileSystemError { operation, path: path.as_ref().to_path_buf(), source }
    }

    /// Source diagnostic for language errors.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::SyntaxError(d) | Error::ParseError(d) | Error::InterpretError(d) => Some(d),
            _ => None,
        }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
