//! Realizes an entity [`Tree`] on disk.
//!
//! Entries are created depth-first in declaration order: at every level the
//! sub-directories (recursively) come first, then files, then links. The first
//! failure aborts the run; anything already created is left in place.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{symlink, DirBuilderExt, OpenOptionsExt};
use std::path::Path;

use log::debug;

use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::tree::{Content, Directory, File, Link, Tree, DEFAULT_DIR_MODE};
use crate::umask::{CreationMask, MaskGuard, ProcessUmask};

/// Materializes `tree` with the MiniJinja renderer and the process umask.
pub fn materialize(tree: &Tree, context: &ExecutionContext) -> Result<()> {
    Materializer::new(context).materialize(tree)
}

pub struct Materializer<'a> {
    context: &'a ExecutionContext,
    renderer: Box<dyn TemplateRenderer>,
    mask: Box<dyn CreationMask>,
}

impl<'a> Materializer<'a> {
    pub fn new(context: &'a ExecutionContext) -> Self {
        Self {
            context,
            renderer: Box::new(MiniJinjaRenderer::new()),
            mask: Box::new(ProcessUmask),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_mask(mut self, mask: Box<dyn CreationMask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn materialize(&self, tree: &Tree) -> Result<()> {
        self.create_dir(&tree.root)
    }

    fn create_dir(&self, dir: &Directory) -> Result<()> {
        debug!("Creating directory: {}", dir.path.display());
        self.masked(|| {
            DirBuilder::new().recursive(true).mode(dir.mode.permissions()).create(&dir.path)
        })
        .map_err(|e| Error::fs("create directory", &dir.path, e))?;

        for child in &dir.dirs {
            self.create_dir(child)?;
        }
        for file in &dir.files {
            self.create_file(file)?;
        }
        for link in &dir.links {
            self.create_link(link)?;
        }
        Ok(())
    }

    fn create_file(&self, file: &File) -> Result<()> {
        let contents = self.file_contents(file)?;

        debug!("Writing file: {}", file.path.display());
        self.create_parent(&file.path)?;
        self.masked(|| {
            let mut handle = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(file.mode.permissions())
                .open(&file.path)?;
            handle.write_all(contents.as_bytes())
        })
        .map_err(|e| Error::fs("write file", &file.path, e))
    }

    fn file_contents(&self, file: &File) -> Result<String> {
        match &file.content {
            Content::Empty => Ok(String::new()),
            Content::Inline(text) => Ok(text.clone()),
            Content::Template(template) => {
                let template = self.context.resolve_template(template);
                debug!("Rendering template: {}", template.display());
                self.renderer.render(&template, self.context.functions())
            }
        }
    }

    fn create_link(&self, link: &Link) -> Result<()> {
        self.create_parent(&link.path)?;
        if link.symbolic {
            let target = if link.target.is_absolute() {
                link.target.clone()
            } else {
                std::env::current_dir()
                    .map_err(|e| Error::fs("resolve link target", &link.target, e))?
                    .join(&link.target)
            };
            debug!("Linking (symbolic): {} -> {}", link.path.display(), target.display());
            self.masked(|| symlink(&target, &link.path))
                .map_err(|e| Error::fs("create symbolic link", &link.path, e))
        } else {
            debug!("Linking: {} -> {}", link.path.display(), link.target.display());
            self.masked(|| fs::hard_link(&link.target, &link.path))
                .map_err(|e| Error::fs("create hard link", &link.path, e))
        }
    }

    fn create_parent(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self
                .masked(|| {
                    DirBuilder::new()
                        .recursive(true)
                        .mode(DEFAULT_DIR_MODE.permissions())
                        .create(parent)
                })
                .map_err(|e| Error::fs("create directory", parent, e)),
            _ => Ok(()),
        }
    }

    /// Runs `op` with the creation mask cleared.
    fn masked<T>(&self, op: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
        let _guard = MaskGuard::clear(&*self.mask);
        op()
    }
}
