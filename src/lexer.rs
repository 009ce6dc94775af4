//! Tokenizer for the tree language.

use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::error::{Diagnostic, Reason, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    Attribute,
    String,
    Number,
    Dir,
    File,
    Link,
    Newline,
    Comment,
    Eof,
    Error,
}

impl TokenKind {
    /// Kinds accepted by the `literal` grammar rule.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Dir
                | TokenKind::File
                | TokenKind::Link
                | TokenKind::Attribute
                | TokenKind::String
                | TokenKind::Number
        )
    }

    /// Tokens the parser skips between any two grammar tokens.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment)
    }

    fn keyword(ident: &str) -> Option<Self> {
        match ident {
            "dir" => Some(TokenKind::Dir),
            "file" => Some(TokenKind::File),
            "link" => Some(TokenKind::Link),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text. Strings exclude the quotes, attributes include the `@`.
    pub text: String,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {})", self.kind, self.text, self.offset)
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Lexes the whole source. Mostly useful for inspecting token streams.
    pub fn tokenize(src: &'a str) -> (Vec<Token>, Diagnostics) {
        let mut lexer = Lexer::new(src);
        let mut diagnostics = Diagnostics::new();
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token(&mut diagnostics);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return (tokens, diagnostics);
            }
        }
    }

    /// Produces the next token. Lexical errors are recorded in `diagnostics`
    /// and come back as [`TokenKind::Error`] tokens. Once the input is
    /// exhausted every call returns an EOF token.
    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '\r') {
                self.bump();
            } else {
                break;
            }
        }

        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '(' => {
                self.bump();
                self.token(TokenKind::LParen, start)
            }
            ')' => {
                self.bump();
                self.token(TokenKind::RParen, start)
            }
            '\n' => {
                self.bump();
                self.token(TokenKind::Newline, start)
            }
            ';' => {
                self.bump_while(|c| c != '\n');
                self.token(TokenKind::Comment, start)
            }
            '@' => {
                self.bump();
                self.bump_while(|c| !(c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')));
                self.token(TokenKind::Attribute, start)
            }
            '"' => self.string(start, diagnostics),
            c if c.is_ascii_digit() => {
                self.bump_while(|c| c.is_ascii_digit());
                self.token(TokenKind::Number, start)
            }
            c if c.is_ascii_alphabetic() => {
                self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
                let ident = &self.src[start..self.pos];
                match TokenKind::keyword(ident) {
                    Some(kind) => self.token(kind, start),
                    None => self.error(Reason::UnknownKeyword(ident.to_string()), start, diagnostics),
                }
            }
            c => {
                self.bump();
                self.error(Reason::InvalidCharacter(c), start, diagnostics)
            }
        }
    }

    fn string(&mut self, start: usize, diagnostics: &mut Diagnostics) -> Token {
        self.bump();
        self.bump_while(|c| c != '"');
        if self.peek().is_none() {
            return self.error(Reason::UnterminatedString, start, diagnostics);
        }
        let text = self.src[start + 1..self.pos].to_string();
        self.bump();
        Token { kind: TokenKind::String, text, offset: start }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token { kind, text: self.src[start..self.pos].to_string(), offset: start }
    }

    fn error(&self, reason: Reason, start: usize, diagnostics: &mut Diagnostics) -> Token {
        diagnostics.push(Diagnostic::new(Stage::Syntax, reason, self.src, start));
        self.token(TokenKind::Error, start)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn bump_while(&mut self, test: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !test(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}
