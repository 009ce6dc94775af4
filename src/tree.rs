//! The entity tree produced by the interpreter.

use std::fmt::{self, Write as _};
use std::path::{Component, Path, PathBuf};

/// Permission bits plus a directory flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(u32);

impl Mode {
    /// Same value as `S_IFDIR`.
    pub const DIR: u32 = 0o040000;
    const PERMISSIONS: u32 = 0o7777;

    pub const fn file(bits: u32) -> Self {
        Mode(bits & Self::PERMISSIONS)
    }

    pub const fn dir(bits: u32) -> Self {
        Mode((bits & Self::PERMISSIONS) | Self::DIR)
    }

    /// The bits handed to the OS when creating the entry.
    pub fn permissions(self) -> u32 {
        self.0 & Self::PERMISSIONS
    }

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIR != 0
    }
}

pub const DEFAULT_DIR_MODE: Mode = Mode::dir(0o777);
pub const DEFAULT_FILE_MODE: Mode = Mode::file(0o666);

impl fmt::Display for Mode {
    /// `ls -l` style, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.0;
        f.write_char(if self.is_dir() { 'd' } else { '-' })?;
        // (shift, special bit, set char, unset char)
        let triads = [(6, 0o4000, 's', 'S'), (3, 0o2000, 's', 'S'), (0, 0o1000, 't', 'T')];
        for (shift, special, set, unset) in triads {
            let triad = (bits >> shift) & 0o7;
            f.write_char(if triad & 0o4 != 0 { 'r' } else { '-' })?;
            f.write_char(if triad & 0o2 != 0 { 'w' } else { '-' })?;
            let exec = triad & 0o1 != 0;
            let c = match (bits & special != 0, exec) {
                (true, true) => set,
                (true, false) => unset,
                (false, true) => 'x',
                (false, false) => '-',
            };
            f.write_char(c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub path: PathBuf,
    pub mode: Mode,
    pub dirs: Vec<Directory>,
    pub files: Vec<File>,
    pub links: Vec<Link>,
}

impl Directory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            mode: DEFAULT_DIR_MODE,
            dirs: Vec::new(),
            files: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// What a file is filled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    Inline(String),
    /// Path to a template, relative to the source file's directory.
    Template(PathBuf),
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::Inline(text) => text.is_empty(),
            Content::Template(path) => path.as_os_str().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: PathBuf,
    pub mode: Mode,
    pub content: Content,
}

impl File {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), mode: DEFAULT_FILE_MODE, content: Content::Empty }
    }

    /// Number of bytes of inline content. Templates count as zero until rendered.
    pub fn content_len(&self) -> usize {
        match &self.content {
            Content::Inline(text) => text.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub path: PathBuf,
    pub target: PathBuf,
    pub symbolic: bool,
}

/// A fully evaluated tree, rooted at the interpreter's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub root: Directory,
}

impl Tree {
    pub fn debug_print(&self) -> String {
        debug_print(self)
    }
}

/// One line per entry, depth-first, directories then files then links at
/// each level:
///
/// ```text
/// drwxrwxrwx root
/// drwx------ root/a
/// -rwxr-xr-x root/a/b 0
/// lrwxrwxrwx root/c -> root/a/b
/// ```
pub fn debug_print(tree: &Tree) -> String {
    let mut out = String::new();
    print_dir(&tree.root, &mut out);
    out
}

fn print_dir(dir: &Directory, out: &mut String) {
    out.push_str(&format!("{} {}\n", dir.mode, dir.path.display()));
    for child in &dir.dirs {
        print_dir(child, out);
    }
    for file in &dir.files {
        out.push_str(&format!("{} {} {}\n", file.mode, file.path.display(), file.content_len()));
    }
    for link in &dir.links {
        let mode = if link.symbolic { "lrwxrwxrwx" } else { "h---------" };
        out.push_str(&format!("{} {} -> {}\n", mode, link.path.display(), link.target.display()));
    }
}

/// Joins `name` onto `parent` and cleans the result lexically. Leading
/// separators in `name` do not make it absolute.
pub fn join_normalized(parent: &Path, name: &str) -> PathBuf {
    let relative: PathBuf = Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    normalize(&parent.join(relative))
}

/// Lexical clean: collapses repeated separators, drops `.` and folds `..`
/// into its parent where possible.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
