//! Folding ranges for blocks, LOD expressions and block comments.

use crate::syntax::SymbolKind;

use super::cache::ParsedDocument;

/// Kind of folding range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldingKind {
    Region,
    Comment,
}

impl FoldingKind {
    /// LSP folding range kind string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FoldingKind::Region => "region",
            FoldingKind::Comment => "comment",
        }
    }
}

/// A foldable line range (0-indexed, inclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldingRange {
    pub start_line: u32,
    pub end_line: u32,
    pub kind: FoldingKind,
}

/// Get folding ranges for a parsed document, sorted by start line.
///
/// IF/CASE blocks fold from their keyword to their END; blocks still missing
/// END are not folded.
pub fn folding_ranges(parsed: &ParsedDocument) -> Vec<FoldingRange> {
    let tree = &parsed.tree;
    let mut ranges = Vec::new();

    for (_, symbol) in tree.iter() {
        let (end_line, kind) = match symbol.kind {
            SymbolKind::Keyword if symbol.is_block() => {
                let Some(end) = symbol.end.and_then(|id| tree.get(id)) else {
                    continue;
                };
                (end.span.end.line, FoldingKind::Region)
            }
            SymbolKind::LodExpression => (symbol.span.end.line, FoldingKind::Region),
            SymbolKind::Comment => (symbol.span.end.line, FoldingKind::Comment),
            _ => continue,
        };
        if end_line > symbol.span.start.line {
            ranges.push(FoldingRange {
                start_line: symbol.span.start.line,
                end_line,
                kind,
            });
        }
    }

    ranges.sort_by_key(|r| (r.start_line, r.end_line));
    ranges
}
