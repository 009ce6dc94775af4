//! mktree creates filesystem trees from a small declarative language.
//! A tree source describes directories, files and links with permissions,
//! inline contents or templates; variables are substituted before parsing.
//!
//! ```
//! use indexmap::IndexMap;
//!
//! let tree = mktree::interpreter::interpret(r#"(dir "src" (@perms 0755))"#, &IndexMap::new(), false)
//!     .unwrap();
//! assert_eq!(tree.debug_print(), "drwxrwxrwx .\ndrwxr-xr-x src\n");
//! ```

/// Default template functions
pub mod builtins;

/// Command-line interface module for the mktree binary
pub mod cli;

/// Variable loading from flags and variables files
pub mod config;

/// Template function registry and source root for a run
pub mod context;

/// Ordered sink for lexer and parser diagnostics
pub mod diagnostics;

/// Error types and handling
pub mod error;

/// Semantic evaluation of parsed sources into entity trees
pub mod interpreter;

/// Tokenizer
pub mod lexer;

/// Filesystem realization of entity trees
pub mod materializer;

/// Recursive-descent parser producing s-expressions
pub mod parser;

/// `%(name)` variable substitution
pub mod preprocessor;

/// Template rendering for `@template` files
pub mod renderer;

/// Entity tree types and path helpers
pub mod tree;

/// Process umask guard
pub mod umask;
