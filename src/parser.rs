//! Recursive-descent parser for the tree language.
//!
//! ```text
//! tree    = sexpr*
//! sexpr   = '(' literal arg* ')'
//! arg     = sexpr | literal
//! literal = keyword | attribute | string | number
//! ```
//!
//! Newlines and comments may appear between any two grammar tokens. The parser
//! recovers from errors by skipping the offending token, so one run reports
//! every problem it finds; the first one is the authoritative failure.

use crate::diagnostics::Diagnostics;
use crate::error::{Diagnostic, Reason, Result, Stage};
use crate::lexer::{Lexer, Token, TokenKind};

/// The parsed source: a sequence of top-level s-expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    pub exprs: Vec<SExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SExpr {
    /// Leading literal; its kind decides what the expression means.
    pub head: Literal,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    SExpr(SExpr),
    Literal(Literal),
}

impl Arg {
    /// First token of the argument.
    pub fn token(&self) -> &Token {
        match self {
            Arg::SExpr(e) => &e.head.token,
            Arg::Literal(l) => &l.token,
        }
    }
}

/// Parses `source`, failing with the first diagnostic.
pub fn parse(source: &str) -> Result<Ast> {
    let (ast, diagnostics) = parse_with_diagnostics(source);
    diagnostics.into_result(ast)
}

/// Parses `source` and returns every diagnostic alongside a best-effort AST.
pub fn parse_with_diagnostics(source: &str) -> (Ast, Diagnostics) {
    let mut parser = Parser::new(source);
    let ast = parser.parse_ast();
    (ast, parser.diagnostics)
}

pub struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    /// Offset of a token that already produced a parse error.
    marked: Option<usize>,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut parser = Self {
            src,
            lexer: Lexer::new(src),
            current: Token { kind: TokenKind::Eof, text: String::new(), offset: 0 },
            marked: None,
            diagnostics: Diagnostics::new(),
        };
        parser.bump();
        parser
    }

    pub fn parse_ast(&mut self) -> Ast {
        let mut exprs = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::LParen => {
                    if let Some(expr) = self.parse_sexpr() {
                        exprs.push(expr);
                    }
                }
                _ => {
                    self.unexpected();
                    self.bump();
                }
            }
        }
        Ast { exprs }
    }

    fn parse_sexpr(&mut self) -> Option<SExpr> {
        self.bump(); // '('

        let head = self.parse_literal();
        let mut args = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::RParen => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => {
                    self.unexpected();
                    break;
                }
                TokenKind::LParen => {
                    if let Some(expr) = self.parse_sexpr() {
                        args.push(Arg::SExpr(expr));
                    }
                }
                _ => {
                    if let Some(literal) = self.parse_literal() {
                        args.push(Arg::Literal(literal));
                    } else {
                        self.bump();
                    }
                }
            }
        }

        head.map(|head| SExpr { head, args })
    }

    /// Consumes a literal. On anything else reports it and leaves it in place.
    fn parse_literal(&mut self) -> Option<Literal> {
        if self.current.kind.is_literal() {
            let token = self.bump();
            return Some(Literal { token });
        }
        self.unexpected();
        None
    }

    fn unexpected(&mut self) {
        if self.current.kind == TokenKind::Error || self.marked == Some(self.current.offset) {
            return;
        }
        let reason = match self.current.kind {
            TokenKind::Eof => Reason::UnexpectedEof,
            _ => Reason::UnexpectedToken(self.current.to_string()),
        };
        self.diagnostics.push(Diagnostic::new(Stage::Parse, reason, self.src, self.current.offset));
        self.marked = Some(self.current.offset);
    }

    /// Advances past trivia and returns the token that was current.
    fn bump(&mut self) -> Token {
        let mut next = self.lexer.next_token(&mut self.diagnostics);
        while next.kind.is_trivia() {
            next = self.lexer.next_token(&mut self.diagnostics);
        }
        std::mem::replace(&mut self.current, next)
    }
}
