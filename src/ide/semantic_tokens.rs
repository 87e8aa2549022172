//! Semantic tokens — syntax highlighting from the token stream.
//!
//! Classification is lexical, refined by the symbol tree for calculation
//! name headers and by the function table for library functions.

use rustc_hash::FxHashSet;

use crate::base::{LineIndex, TextRange, TextSize};
use crate::hir::FunctionTable;
use crate::parser::{SyntaxKind, Token, tokenize};
use crate::syntax::SymbolKind;

use super::cache::ParsedDocument;

/// Token type for semantic highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Keyword,
    Function,
    Field,
    Parameter,
    String,
    Number,
    Operator,
    Comment,
}

impl TokenType {
    /// Legend announced to the editor; indices match [`TokenType::to_lsp_index`].
    pub const LEGEND: &'static [&'static str] = &[
        "keyword",
        "function",
        "property",
        "parameter",
        "string",
        "number",
        "operator",
        "comment",
    ];

    /// Convert to LSP token type index.
    pub fn to_lsp_index(self) -> u32 {
        match self {
            TokenType::Keyword => 0,
            TokenType::Function => 1,
            TokenType::Field => 2,
            TokenType::Parameter => 3,
            TokenType::String => 4,
            TokenType::Number => 5,
            TokenType::Operator => 6,
            TokenType::Comment => 7,
        }
    }
}

/// Modifier bits, in legend order.
pub mod token_modifiers {
    pub const LEGEND: &[&str] = &["defaultLibrary", "declaration"];

    /// Function found in the signature table.
    pub const DEFAULT_LIBRARY: u32 = 1 << 0;
    /// The `[Name]:` header naming the calculation.
    pub const DECLARATION: u32 = 1 << 1;
}

/// A semantic token for syntax highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    /// Line number (0-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub col: u32,
    /// Length of the token in characters
    pub length: u32,
    /// The token type
    pub token_type: TokenType,
    /// Bitmask of [`token_modifiers`].
    pub modifiers: u32,
}

/// Get semantic tokens for a parsed document, sorted by position.
///
/// Multi-line block comments are split into one token per line.
pub fn semantic_tokens(parsed: &ParsedDocument, table: &FunctionTable) -> Vec<SemanticToken> {
    let text: &str = &parsed.text;
    let index = LineIndex::new(text);
    let scanned = tokenize(text);

    let declarations: FxHashSet<TextSize> = parsed
        .tree
        .iter()
        .filter(|(_, s)| s.kind == SymbolKind::CalculationName)
        .map(|(_, s)| s.range.start())
        .collect();

    let mut out = Vec::new();
    let tokens = &scanned.tokens;
    for (i, token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1);
        let classified = match token.kind {
            kind if kind.is_keyword() => Some((TokenType::Keyword, 0)),
            kind if kind.is_operator() => Some((TokenType::Operator, 0)),
            SyntaxKind::STRING => Some((TokenType::String, 0)),
            SyntaxKind::NUMBER | SyntaxKind::DATE => Some((TokenType::Number, 0)),
            SyntaxKind::IDENT if next.is_some_and(|t| t.kind == SyntaxKind::L_PAREN) => {
                let modifiers = if table.contains(token.text) {
                    token_modifiers::DEFAULT_LIBRARY
                } else {
                    0
                };
                Some((TokenType::Function, modifiers))
            }
            SyntaxKind::FIELD_REF => Some(classify_field(tokens, i, &declarations)),
            _ => None,
        };
        if let Some((token_type, modifiers)) = classified {
            push_range(&mut out, &index, text, token.range, token_type, modifiers);
        }
    }
    for &range in &scanned.comments {
        push_range(&mut out, &index, text, range, TokenType::Comment, 0);
    }

    out.sort_by_key(|t| (t.line, t.col));
    out
}

fn classify_field(
    tokens: &[Token<'_>],
    i: usize,
    declarations: &FxHashSet<TextSize>,
) -> (TokenType, u32) {
    let token = &tokens[i];
    if declarations.contains(&token.offset()) {
        return (TokenType::Field, token_modifiers::DECLARATION);
    }
    let is_parameters = |t: &Token<'_>| {
        t.kind == SyntaxKind::FIELD_REF && t.text.eq_ignore_ascii_case("[Parameters]")
    };
    // `[Parameters].[Name]`: both halves highlight as a parameter.
    let qualifier = is_parameters(token)
        && tokens.get(i + 1).is_some_and(|t| t.kind == SyntaxKind::DOT)
        && tokens.get(i + 2).is_some_and(|t| t.kind == SyntaxKind::FIELD_REF);
    let member = i >= 2
        && tokens[i - 1].kind == SyntaxKind::DOT
        && is_parameters(&tokens[i - 2]);
    if qualifier || member {
        (TokenType::Parameter, 0)
    } else {
        (TokenType::Field, 0)
    }
}

fn push_range(
    out: &mut Vec<SemanticToken>,
    index: &LineIndex<'_>,
    text: &str,
    range: TextRange,
    token_type: TokenType,
    modifiers: u32,
) {
    let mut start = range.start();
    for line in text[range].split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let length = content.chars().count() as u32;
        if length > 0 {
            let pos = index.line_col(start);
            out.push(SemanticToken {
                line: pos.line,
                col: pos.col,
                length,
                token_type,
                modifiers,
            });
        }
        start += TextSize::of(line);
    }
}

/// Encode tokens as the flat relative form editors expect:
/// `(Δline, Δcol, length, type, modifiers)` per token.
///
/// Deltas are relative, so tokens are encoded in document order whatever
/// order they arrive in.
pub fn encode_semantic_tokens(tokens: &[SemanticToken]) -> Vec<u32> {
    let mut ordered: Vec<_> = tokens.iter().collect();
    ordered.sort_by_key(|t| (t.line, t.col));

    let mut data = Vec::with_capacity(tokens.len() * 5);
    let (mut prev_line, mut prev_col) = (0, 0);
    for token in ordered {
        let delta_line = token.line - prev_line;
        let delta_col = if delta_line == 0 {
            token.col - prev_col
        } else {
            token.col
        };
        data.extend([
            delta_line,
            delta_col,
            token.length,
            token.token_type.to_lsp_index(),
            token.modifiers,
        ]);
        prev_line = token.line;
        prev_col = token.col;
    }
    data
}
