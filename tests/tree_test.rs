use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mktree::interpreter::Interpreter;
use mktree::tree::{join_normalized, normalize, Mode};

fn debug(source: &str) -> String {
    Interpreter::new("[example]").interpret(source).unwrap().debug_print()
}

#[test]
fn test_mode_display() {
    assert_eq!(Mode::dir(0o777).to_string(), "drwxrwxrwx");
    assert_eq!(Mode::dir(0o700).to_string(), "drwx------");
    assert_eq!(Mode::file(0o755).to_string(), "-rwxr-xr-x");
    assert_eq!(Mode::file(0o644).to_string(), "-rw-r--r--");
    assert_eq!(Mode::file(0o4755).to_string(), "-rwsr-xr-x");
    assert_eq!(Mode::dir(0o1777).to_string(), "drwxrwxrwt");
    assert_eq!(Mode::file(0o2644).to_string(), "-rw-r-Sr--");
}

#[test]
fn test_mode_permissions_strip_dir_flag() {
    assert_eq!(Mode::dir(0o755).permissions(), 0o755);
    assert!(!Mode::file(0o755).is_dir());
}

#[test]
fn test_normalize() {
    assert_eq!(normalize(Path::new("a//b/./c/")), PathBuf::from("a/b/c"));
    assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
    assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
    assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    assert_eq!(join_normalized(Path::new("/r"), "///a/b///c"), PathBuf::from("/r/a/b/c"));
}

#[test]
fn test_debug_dir() {
    assert_eq!(debug(r#"(dir "test")"#), "drwxrwxrwx [example]\ndrwxrwxrwx [example]/test\n");
}

#[test]
fn test_debug_file() {
    assert_eq!(debug(r#"(file "test")"#), "drwxrwxrwx [example]\n-rw-rw-rw- [example]/test 0\n");
}

#[test]
fn test_debug_tree_with_perms() {
    let out = debug(
        r#"
        (dir "a"
            (@perms 0700)
            (file "b"
                (@perms 0755)
                (@contents "hello")))
        "#,
    );
    assert_eq!(
        out,
        "drwxrwxrwx [example]\ndrwx------ [example]/a\n-rwxr-xr-x [example]/a/b 5\n"
    );
}

#[test]
fn test_debug_orders_dirs_files_links() {
    let out = debug(
        r#"
        (link "z" "l1" (@symbolic))
        (file "f1")
        (dir "d1")
        (link "f1" "l2")
        (file "f2")
        (dir "d2" (file "inner"))
        "#,
    );
    let want = "\
drwxrwxrwx [example]
drwxrwxrwx [example]/d1
drwxrwxrwx [example]/d2
-rw-rw-rw- [example]/d2/inner 0
-rw-rw-rw- [example]/f1 0
-rw-rw-rw- [example]/f2 0
lrwxrwxrwx [example]/l1 -> [example]/z
h--------- [example]/l2 -> [example]/f1
";
    assert_eq!(out, want);
}

#[test]
fn test_debug_vars() {
    let mut vars = IndexMap::new();
    vars.insert("dirname".to_string(), "a".to_string());
    vars.insert("filename".to_string(), "b.txt".to_string());
    vars.insert("perms".to_string(), "0555".to_string());

    let out = Interpreter::new("[example]")
        .with_variables(vars)
        .unwrap()
        .interpret(
            r#"
            (dir "%(dirname)" (@perms %(perms)))
            (file "%(filename)" (@perms %(perms)))
            (dir "%(root_dir)")
            "#,
        )
        .unwrap()
        .debug_print();
    assert_eq!(
        out,
        "drwxrwxrwx [example]\ndr-xr-xr-x [example]/a\ndrwxrwxrwx [example]/[example]\n-r-xr-xr-x [example]/b.txt 0\n"
    );
}

#[test]
fn test_debug_parent_dirs_are_implicit() {
    assert_eq!(
        debug(r#"(file "/a/b/c/d/e.txt")"#),
        "drwxrwxrwx [example]\n-rw-rw-rw- [example]/a/b/c/d/e.txt 0\n"
    );
}
