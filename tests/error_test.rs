use std::io;

use mktree::diagnostics::Diagnostics;
use mktree::error::{Diagnostic, Error, Reason, Stage};

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::UndefinedVariable("name".to_string());
    assert_eq!(err.to_string(), "undefined variable: \"name\"");

    let err = Error::fs("write file", "/tmp/x", io::Error::new(io::ErrorKind::Other, "boom"));
    assert_eq!(err.to_string(), "failed to write file '/tmp/x': boom");
}

#[test]
fn test_diagnostic_position_and_excerpt() {
    let source = "(dir \"a\")\n(file \"b\" (@perms 55))";
    let offset = source.find("55").unwrap();
    let d = Diagnostic::new(Stage::Interpret, Reason::InvalidFileMode("55".to_string()), source, offset);

    assert_eq!((d.line, d.column), (2, 19));
    assert_eq!(d.excerpt, "(file \"b\" (@perms 55))\n------------------^");

    let err: Error = d.into();
    assert!(matches!(err, Error::InterpretError(_)));
    assert!(err.to_string().starts_with("interpret error: invalid file mode \"55\" at line 2 col 19:"));
}

#[test]
fn test_diagnostics_keep_first_error() {
    let source = "! ?";
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.clone().into_result(()).is_ok());

    diagnostics.push(Diagnostic::new(Stage::Syntax, Reason::InvalidCharacter('!'), source, 0));
    diagnostics.push(Diagnostic::new(Stage::Parse, Reason::UnexpectedEof, source, 3));
    assert_eq!(diagnostics.len(), 2);

    match diagnostics.into_result(()) {
        Err(Error::SyntaxError(d)) => assert_eq!(d.offset, 0),
        other => panic!("expected first diagnostic, got {:?}", other),
    }
}
