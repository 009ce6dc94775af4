use clap::Parser;
use mktree::cli::Args;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("mktree")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./layout.tree"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.source, PathBuf::from("./layout.tree"));
    assert_eq!(parsed.root, PathBuf::from("."));
    assert!(parsed.vars.is_empty());
    assert!(parsed.vars_file.is_none());
    assert!(!parsed.allow_undefined_vars);
    assert!(!parsed.debug);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--root",
        "out",
        "--var",
        "name=demo",
        "--var",
        "perms=0755",
        "--vars-file",
        "vars.yml",
        "--allow-undefined-vars",
        "--debug",
        "--verbose",
        "layout.tree",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.root, PathBuf::from("out"));
    assert_eq!(
        parsed.vars,
        vec![
            ("name".to_string(), "demo".to_string()),
            ("perms".to_string(), "0755".to_string())
        ]
    );
    assert_eq!(parsed.vars_file, Some(PathBuf::from("vars.yml")));
    assert!(parsed.allow_undefined_vars);
    assert!(parsed.debug);
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-r", "out", "-d", "-v", "layout.tree"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.root, PathBuf::from("out"));
    assert!(parsed.debug);
    assert!(parsed.verbose);
}

#[test]
fn test_invalid_var() {
    assert!(Args::try_parse_from(make_args(&["--var", "novalue", "layout.tree"])).is_err());
    assert!(Args::try_parse_from(make_args(&["--var", "=x", "layout.tree"])).is_err());
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["layout.tree", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
