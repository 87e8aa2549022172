//! Logos-based lexer for calculation text
//!
//! Fast tokenization using the logos crate. Whitespace and comments are
//! consumed here: comments are recorded as byte ranges, whitespace only
//! advances the line/column counters.

use super::keywords::keyword_kind;
use super::syntax_kind::SyntaxKind;
use crate::base::{TextRange, TextSize};
use logos::Logos;

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub range: TextRange,
    /// Line of the first char (0-indexed)
    pub line: u32,
    /// Column of the first char, in chars (0-indexed)
    pub column: u32,
}

impl Token<'_> {
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }
}

/// Lexer wrapping the logos-generated tokenizer.
///
/// Yields every content token followed by exactly one `EOF`. A clone scans
/// on independently from the same position; `Lexer::new` restarts the scan.
#[derive(Clone)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    line: u32,
    col_cursor: usize,
    col_chars: u32,
    comments: Vec<TextRange>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            line: 0,
            col_cursor: 0,
            col_chars: 0,
            comments: Vec::new(),
            finished: false,
        }
    }

    /// Comment ranges seen so far.
    pub fn comments(&self) -> &[TextRange] {
        &self.comments
    }

    /// Consume the lexer, returning the recorded comment ranges.
    pub fn into_comments(self) -> Vec<TextRange> {
        self.comments
    }

    fn column_at(&mut self, start: usize) -> u32 {
        let source = self.inner.source();
        if start > self.col_cursor {
            self.col_chars += source[self.col_cursor..start].chars().count() as u32;
            self.col_cursor = start;
        }
        self.col_chars
    }

    fn advance_over(&mut self, start: usize, text: &str) {
        match text.rfind('\n') {
            Some(last_newline) => {
                self.line += text.matches('\n').count() as u32;
                self.col_chars = text[last_newline + 1..].chars().count() as u32;
                self.col_cursor = start + text.len();
            }
            None => {
                self.col_chars += text.chars().count() as u32;
                self.col_cursor = start + text.len();
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(logos_token) = self.inner.next() else {
                if self.finished {
                    return None;
                }
                self.finished = true;
                let source = self.inner.source();
                let end = source.len();
                let column = self.column_at(end);
                let offset = TextSize::from(end as u32);
                return Some(Token {
                    kind: SyntaxKind::EOF,
                    text: "",
                    range: TextRange::empty(offset),
                    line: self.line,
                    column,
                });
            };

            let span = self.inner.span();
            let text = self.inner.slice();
            let kind = match logos_token {
                Ok(t) => t.kind(text),
                Err(()) => SyntaxKind::UNEXPECTED,
            };

            let line = self.line;
            let column = self.column_at(span.start);
            self.advance_over(span.start, text);

            let range = TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            );

            match kind {
                SyntaxKind::WHITESPACE => continue,
                SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT => {
                    self.comments.push(range);
                    continue;
                }
                _ => {
                    return Some(Token {
                        kind,
                        text,
                        range,
                        line,
                        column,
                    });
                }
            }
        }
    }
}

/// All tokens of a text plus the comment ranges the lexer skipped.
#[derive(Debug, Clone, Default)]
pub struct Tokens<'a> {
    pub tokens: Vec<Token<'a>>,
    pub comments: Vec<TextRange>,
}

/// Tokenize an entire string
pub fn tokenize(input: &str) -> Tokens<'_> {
    let mut lexer = Lexer::new(input);
    let tokens: Vec<_> = lexer.by_ref().collect();
    Tokens {
        tokens,
        comments: lexer.into_comments(),
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // UNTERMINATED CONSTRUCTS (shorter than their closed forms, so a closed
    // form always wins the longest match)
    // =========================================================================
    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    UnterminatedComment,

    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*")]
    UnterminatedString,

    #[regex(r"\[[^\]\n]*")]
    UnterminatedField,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    String,

    #[regex(r"#[^#\n]*#")]
    Date,

    #[regex(r"\[[^\]\n]*\]")]
    FieldRef,

    // =========================================================================
    // MULTI-CHARACTER OPERATORS (must come before single-char)
    // =========================================================================
    #[token("==")]
    EqEq,
    #[token("!=")]
    #[token("<>")]
    Neq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

impl LogosToken {
    /// Map to a SyntaxKind; identifiers are checked against the keyword table.
    fn kind(self, text: &str) -> SyntaxKind {
        use LogosToken::*;
        match self {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            UnterminatedComment | UnterminatedString | UnterminatedField => {
                SyntaxKind::UNEXPECTED
            }

            // Literals
            Ident => keyword_kind(text).unwrap_or(SyntaxKind::IDENT),
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,
            Date => SyntaxKind::DATE,
            FieldRef => SyntaxKind::FIELD_REF,

            // Operators and punctuation
            EqEq => SyntaxKind::EQ_EQ,
            Neq => SyntaxKind::NEQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Comma => SyntaxKind::COMMA,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Caret => SyntaxKind::CARET,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
        }
    }
}
