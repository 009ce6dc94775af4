//! Turns tree source into an entity [`Tree`].
//!
//! Source goes through the preprocessor, then the parser, then the evaluator
//! below, which walks the s-expressions and applies the semantic rules of each
//! entity type.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::context::ExecutionContext;
use crate::error::{Diagnostic, Error, Reason, Result, Stage};
use crate::lexer::{Token, TokenKind};
use crate::materializer::materialize;
use crate::parser::{parse, Arg, Ast, SExpr};
use crate::preprocessor::preprocess;
use crate::tree::{join_normalized, normalize, Content, Directory, File, Link, Mode, Tree};

/// Variable bound to the interpreter's root directory.
pub const ROOT_DIR_VAR: &str = "root_dir";

/// Interprets `source` against root `.`.
pub fn interpret(source: &str, variables: &IndexMap<String, String>, permissive: bool) -> Result<Tree> {
    Interpreter::new(".")
        .with_variables(variables.clone())?
        .permissive(permissive)
        .interpret(source)
}

#[derive(Debug, Clone)]
pub struct Interpreter {
    root: PathBuf,
    vars: IndexMap<String, String>,
    permissive: bool,
}

impl Interpreter {
    /// An empty `root` means the current directory. A root that is not valid
    /// UTF-8 is not bound to `root_dir` and fails at interpretation.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let mut root = root.into();
        if root.as_os_str().is_empty() {
            root = PathBuf::from(".");
        }
        let mut vars = IndexMap::new();
        if let Some(name) = root.to_str() {
            vars.insert(ROOT_DIR_VAR.to_string(), name.to_string());
        }
        Self { root, vars, permissive: false }
    }

    /// Adds caller variables. `root_dir` is reserved and rejected.
    pub fn with_variables(mut self, vars: IndexMap<String, String>) -> Result<Self> {
        if vars.contains_key(ROOT_DIR_VAR) {
            return Err(Error::ReservedVariable(ROOT_DIR_VAR.to_string()));
        }
        self.vars.extend(vars);
        Ok(self)
    }

    /// Leave references to undefined variables unexpanded instead of failing.
    pub fn permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All variables visible to the source, `root_dir` included.
    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.vars
    }

    pub fn interpret(&self, source: &str) -> Result<Tree> {
        if self.root.to_str().is_none() {
            return Err(Error::InvalidRoot(self.root.clone()));
        }
        let source = preprocess(source, &self.vars, self.permissive)?;
        let ast = parse(&source)?;
        debug!("Parsed {} top-level expression(s)", ast.exprs.len());

        let mut root = Directory::new(self.root.clone());
        Evaluator { source: source.as_ref() }.eval_ast(&ast, &mut root)?;
        Ok(Tree { root })
    }

    pub fn interpret_file<P: AsRef<Path>>(&self, path: P) -> Result<Tree> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| Error::fs("read", path, e))?;
        self.interpret(&source)
    }

    /// Interprets the file at `path` and materializes the result, rendering
    /// templates relative to the file's directory with the builtin functions.
    pub fn exec_file<P: AsRef<Path>>(&self, path: P) -> Result<Tree> {
        let path = path.as_ref();
        let tree = self.interpret_file(path)?;
        let context = ExecutionContext::for_source_file(path).with_builtins(&self.vars);
        materialize(&tree, &context)?;
        Ok(tree)
    }
}

/// Entities that accept `(@name args...)` expressions.
trait Attributes {
    const KIND: &'static str;

    fn set_attribute(&mut self, eval: &Evaluator, name: &Token, args: &[Arg]) -> Result<()>;
}

impl Attributes for Directory {
    const KIND: &'static str = "directory";

    fn set_attribute(&mut self, eval: &Evaluator, name: &Token, args: &[Arg]) -> Result<()> {
        match attribute_name(name) {
            "perms" => {
                let arg = eval.single_arg(name, "perms", args)?;
                self.mode = Mode::dir(eval.file_mode(arg)?);
                Ok(())
            }
            _ => Err(eval.invalid_attribute::<Self>(name)),
        }
    }
}

impl Attributes for File {
    const KIND: &'static str = "file";

    fn set_attribute(&mut self, eval: &Evaluator, name: &Token, args: &[Arg]) -> Result<()> {
        match attribute_name(name) {
            "perms" => {
                let arg = eval.single_arg(name, "perms", args)?;
                self.mode = Mode::file(eval.file_mode(arg)?);
            }
            "contents" => {
                let arg = eval.single_arg(name, "contents", args)?;
                if matches!(self.content, Content::Template(_)) && !self.content.is_empty() {
                    return Err(eval.error(name, Reason::TemplateContentsConflict));
                }
                self.content = Content::Inline(eval.string(arg)?.to_string());
            }
            "template" => {
                let arg = eval.single_arg(name, "template", args)?;
                if matches!(self.content, Content::Inline(_)) && !self.content.is_empty() {
                    return Err(eval.error(name, Reason::TemplateContentsConflict));
                }
                self.content = Content::Template(PathBuf::from(eval.string(arg)?));
            }
            _ => return Err(eval.invalid_attribute::<Self>(name)),
        }
        Ok(())
    }
}

impl Attributes for Link {
    const KIND: &'static str = "link";

    fn set_attribute(&mut self, eval: &Evaluator, name: &Token, args: &[Arg]) -> Result<()> {
        match attribute_name(name) {
            "symbolic" => {
                eval.arg_count(name, "symbolic", args, 0)?;
                self.symbolic = true;
                Ok(())
            }
            _ => Err(eval.invalid_attribute::<Self>(name)),
        }
    }
}

fn attribute_name(token: &Token) -> &str {
    token.text.strip_prefix('@').unwrap_or(&token.text)
}

struct Evaluator<'s> {
    /// Preprocessed source, for error excerpts.
    source: &'s str,
}

impl Evaluator<'_> {
    fn eval_ast(&self, ast: &Ast, root: &mut Directory) -> Result<()> {
        for expr in &ast.exprs {
            self.eval_dir_child(root, expr)?;
        }
        Ok(())
    }

    fn eval_dir_child(&self, parent: &mut Directory, expr: &SExpr) -> Result<()> {
        match expr.head.token.kind {
            TokenKind::Attribute => parent.set_attribute(self, &expr.head.token, &expr.args),
            TokenKind::Dir => self.eval_dir(parent, expr),
            TokenKind::File => self.eval_file(parent, expr),
            TokenKind::Link => self.eval_link(parent, expr),
            _ => Err(self.invalid_expression::<Directory>(&expr.head.token)),
        }
    }

    /// Children of files and links may only be attributes.
    fn eval_leaf_children<T: Attributes>(&self, owner: &mut T, args: &[Arg]) -> Result<()> {
        for arg in args {
            match arg {
                Arg::SExpr(e) if e.head.token.kind == TokenKind::Attribute => {
                    owner.set_attribute(self, &e.head.token, &e.args)?
                }
                _ => return Err(self.invalid_expression::<T>(arg.token())),
            }
        }
        Ok(())
    }

    fn eval_dir(&self, parent: &mut Directory, expr: &SExpr) -> Result<()> {
        let Some((name, rest)) = expr.args.split_first() else {
            return Err(self.error(&expr.head.token, Reason::MissingArgument("directory name")));
        };
        let mut dir = Directory::new(join_normalized(&parent.path, self.string(name)?));
        for arg in rest {
            match arg {
                Arg::SExpr(e) => self.eval_dir_child(&mut dir, e)?,
                Arg::Literal(l) => return Err(self.invalid_expression::<Directory>(&l.token)),
            }
        }
        debug!("Evaluated directory {}", dir.path.display());
        parent.dirs.push(dir);
        Ok(())
    }

    fn eval_file(&self, parent: &mut Directory, expr: &SExpr) -> Result<()> {
        let Some((name, rest)) = expr.args.split_first() else {
            return Err(self.error(&expr.head.token, Reason::MissingArgument("filename")));
        };
        let mut file = File::new(join_normalized(&parent.path, self.string(name)?));
        self.eval_leaf_children(&mut file, rest)?;
        debug!("Evaluated file {}", file.path.display());
        parent.files.push(file);
        Ok(())
    }

    fn eval_link(&self, parent: &mut Directory, expr: &SExpr) -> Result<()> {
        let (target, name, rest) = match expr.args.as_slice() {
            [target, name, rest @ ..] => (target, name, rest),
            [_] => return Err(self.error(&expr.head.token, Reason::MissingArgument("link name"))),
            [] => return Err(self.error(&expr.head.token, Reason::MissingArgument("link target"))),
        };
        let target = self.string(target)?;
        let target = if Path::new(target).is_absolute() {
            normalize(Path::new(target))
        } else {
            join_normalized(&parent.path, target)
        };
        let mut link = Link {
            path: join_normalized(&parent.path, self.string(name)?),
            target,
            symbolic: false,
        };
        self.eval_leaf_children(&mut link, rest)?;
        debug!("Evaluated link {} -> {}", link.path.display(), link.target.display());
        parent.links.push(link);
        Ok(())
    }

    fn string<'a>(&self, arg: &'a Arg) -> Result<&'a str> {
        match arg {
            Arg::Literal(l) if l.token.kind == TokenKind::String => Ok(l.token.text.as_str()),
            _ => Err(self.error(arg.token(), Reason::ExpectedString(arg.token().text.clone()))),
        }
    }

    /// Exactly four octal digits, e.g. `0755`.
    fn file_mode(&self, arg: &Arg) -> Result<u32> {
        let token = arg.token();
        let invalid = || self.error(token, Reason::InvalidFileMode(token.text.clone()));
        match arg {
            Arg::Literal(l) if l.token.kind == TokenKind::Number && l.token.text.len() == 4 => {
                u32::from_str_radix(&l.token.text, 8).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }

    fn arg_count(&self, name: &Token, attribute: &'static str, args: &[Arg], expected: usize) -> Result<()> {
        if args.len() != expected {
            return Err(self.error(name, Reason::ArgumentCount { attribute, expected, found: args.len() }));
        }
        Ok(())
    }

    fn single_arg<'a>(&self, name: &Token, attribute: &'static str, args: &'a [Arg]) -> Result<&'a Arg> {
        self.arg_count(name, attribute, args, 1)?;
        Ok(&args[0])
    }

    fn invalid_attribute<T: Attributes>(&self, name: &Token) -> Error {
        let reason = Reason::InvalidAttribute { owner: T::KIND, name: attribute_name(name).to_string() };
        self.error(name, reason)
    }

    fn invalid_expression<T: Attributes>(&self, token: &Token) -> Error {
        self.error(token, Reason::InvalidExpression(token.text.clone(), T::KIND))
    }

    fn error(&self, token: &Token, reason: Reason) -> Error {
        Diagnostic::new(Stage::Interpret, reason, self.source, token.offset).into()
    }
}
