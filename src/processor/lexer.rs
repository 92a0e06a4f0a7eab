//! Small hand-written lexer for scene files.
//!
//! Breaks the raw text into `Token`s carrying a line number and column span.
//! Interior whitespace (spaces, tabs, newlines) is free-form; the parser
//! decides which arguments belong to which command.
//
//  Lexical items:
//
//      Command   ::= ':' [^ \t\r\n]+            (keyword or unknown)
//      Integer   ::= [+-]? [0-9]+
//      Pixels    ::= Integer 'px'
//      Path      ::= [^ \t\r\n]+                 (anything else)
//
//  Lexing stops at the first malformed token; there is no recovery.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::model::{COMMAND_MARKER, Keyword};

/// Numeric class of a token. Commands sit below 128, arguments at or above,
/// so "does an argument follow?" is a single range check.
pub type TokenCode = u8;

pub const ARGUMENT_CODE_START: TokenCode = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Command(Keyword),
    UnknownCommand(String),
    Integer(i64),
    /// Integer written with a `px` suffix.
    Pixels(i64),
    Path(String),
}

impl TokenKind {
    pub fn code(&self) -> TokenCode {
        match self {
            TokenKind::Command(Keyword::CellDimensions) => 0,
            TokenKind::Command(Keyword::TileMap) => 1,
            TokenKind::Command(Keyword::PlaceTile) => 2,
            TokenKind::UnknownCommand(_) => 127,
            TokenKind::Integer(_) => 128,
            TokenKind::Pixels(_) => 129,
            TokenKind::Path(_) => 130,
        }
    }

    pub fn is_command(&self) -> bool {
        self.code() < ARGUMENT_CODE_START
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    /// The lexeme as written, including any `:` or `px`.
    pub text: &'s str,
    pub line: u32,
    /// 1-based, inclusive.
    pub col_start: u32,
    /// 1-based, exclusive.
    pub col_end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    MalformedInteger,
    TrailingCharacters,
    EmptyCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

#[derive(Clone)]
pub struct Lexer<'s> {
    src: &'s str,
    chars: Peekable<CharIndices<'s>>,
    line: u32,
    line_start: usize,
    finished: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
            line_start: 0,
            finished: false,
        }
    }

    fn column_at(&self, offset: usize) -> u32 {
        self.src[self.line_start..offset].chars().count() as u32 + 1
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(idx, c)) = self.chars.peek() {
            if !is_whitespace(c) {
                break;
            }
            self.chars.next();
            if c == '\n' {
                self.line += 1;
                self.line_start = idx + 1;
            }
        }
    }

    /// Consumes a whitespace-terminated run starting at `start`.
    fn read_word(&mut self, start: usize) -> &'s str {
        let mut end = self.src.len();
        while let Some(&(idx, c)) = self.chars.peek() {
            if is_whitespace(c) {
                end = idx;
                break;
            }
            self.chars.next();
        }
        &self.src[start..end]
    }

    fn error(&self, kind: LexErrorKind, column: u32, message: String) -> LexError {
        LexError {
            kind,
            line: self.line,
            column,
            message,
        }
    }

    fn read_command(&mut self, word: &'s str, col: u32) -> Result<TokenKind, LexError> {
        let name = &word[COMMAND_MARKER.len_utf8()..];
        if name.is_empty() {
            return Err(self.error(
                LexErrorKind::EmptyCommand,
                col,
                format!("expected a command name after '{COMMAND_MARKER}'"),
            ));
        }
        Ok(match Keyword::from_name(name) {
            Some(kw) => TokenKind::Command(kw),
            None => TokenKind::UnknownCommand(name.to_string()),
        })
    }

    fn read_number(&mut self, word: &'s str, col: u32) -> Result<TokenKind, LexError> {
        let sign_len = usize::from(word.starts_with(['+', '-']));
        let digits = word[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(word.len() - sign_len);
        let (number, suffix) = word.split_at(sign_len + digits);

        let value: i64 = number.parse().map_err(|e| {
            self.error(
                LexErrorKind::MalformedInteger,
                col,
                format!("malformed integer '{word}': {e}"),
            )
        })?;

        match suffix {
            "" => Ok(TokenKind::Integer(value)),
            "px" => Ok(TokenKind::Pixels(value)),
            _ => Err(self.error(
                LexErrorKind::TrailingCharacters,
                col + number.chars().count() as u32,
                format!("unexpected characters '{suffix}' after integer {number}"),
            )),
        }
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<Token<'s>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();
        let (start, first) = self.chars.next()?;
        let line = self.line;
        let col_start = self.column_at(start);
        let word = self.read_word(start);

        let kind_res = match first {
            COMMAND_MARKER => self.read_command(word, col_start),
            c if c.is_ascii_digit() || c == '+' || c == '-' => self.read_number(word, col_start),
            _ => Ok(TokenKind::Path(word.to_string())),
        };

        let tok_res = kind_res.map(|kind| Token {
            kind,
            text: word,
            line,
            col_start,
            col_end: col_start + word.chars().count() as u32,
        });
        if tok_res.is_err() {
            self.finished = true;
        }
        Some(tok_res)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Lexes the whole text, stopping at the first malformed token.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(src).collect()
}
