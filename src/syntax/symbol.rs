//! Symbol arena — the hierarchical result of the builder.
//!
//! Symbols live in a single `Vec` and refer to each other by [`SymbolId`].
//! `parent` and `end` are plain indices, so the tree needs no shared
//! ownership and can be cloned or compared structurally.

use smol_str::SmolStr;

use crate::base::{Span, TextRange};

/// Handle of a symbol inside its [`SymbolTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    /// The synthetic root every tree starts with.
    pub const ROOT: SymbolId = SymbolId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a symbol represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    FieldReference,
    ParameterReference,
    FunctionCall,
    LodExpression,
    Keyword,
    Comment,
    CalculationName,
    Variable,
    FreeText,
}

impl SymbolKind {
    /// Human-readable name.
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::FieldReference => "field reference",
            SymbolKind::ParameterReference => "parameter reference",
            SymbolKind::FunctionCall => "function call",
            SymbolKind::LodExpression => "LOD expression",
            SymbolKind::Keyword => "keyword",
            SymbolKind::Comment => "comment",
            SymbolKind::CalculationName => "calculation name",
            SymbolKind::Variable => "variable",
            SymbolKind::FreeText => "text",
        }
    }
}

/// One argument of a function call: trimmed source text and its range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSymbol {
    pub text: SmolStr,
    pub range: TextRange,
}

/// A recognized construct in a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Canonical uppercase name (`SUM`, `IF`, `ORDER DATE`).
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub range: TextRange,
    pub span: Span,
    /// Call arguments, in source order. Empty for everything but calls.
    pub arguments: Vec<ArgumentSymbol>,
    /// Owned children, in source order.
    pub children: Vec<SymbolId>,
    /// The END that closes this block, if any.
    pub end: Option<SymbolId>,
    /// The owning symbol; `None` only for the root.
    pub parent: Option<SymbolId>,
    /// Raw text kept for heuristics: the condition of IF/ELSEIF/CASE, the
    /// dimension list of an LOD expression, the content of comments and
    /// free text.
    pub detail: Option<SmolStr>,
}

impl Symbol {
    pub fn new(kind: SymbolKind, name: impl Into<SmolStr>, range: TextRange, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            span,
            arguments: Vec::new(),
            children: Vec::new(),
            end: None,
            parent: None,
            detail: None,
        }
    }

    fn is_keyword(&self, names: &[&str]) -> bool {
        self.kind == SymbolKind::Keyword && names.contains(&self.name.as_str())
    }

    /// IF or CASE.
    pub fn is_block(&self) -> bool {
        self.is_keyword(&["IF", "CASE"])
    }

    /// THEN, ELSEIF, ELSE or WHEN.
    pub fn is_branch(&self) -> bool {
        self.is_keyword(&["THEN", "ELSEIF", "ELSE", "WHEN"])
    }

    pub fn is_end(&self) -> bool {
        self.is_keyword(&["END"])
    }

    /// Whether this symbol contributes content to a branch.
    pub fn is_meaningful(&self) -> bool {
        match self.kind {
            SymbolKind::Comment => false,
            SymbolKind::FreeText => self.name.chars().any(|c| !c.is_whitespace()),
            _ => true,
        }
    }

    /// The condition text recorded for IF/ELSEIF/CASE, empty when absent.
    pub fn condition(&self) -> &str {
        self.detail.as_deref().unwrap_or("")
    }
}

/// Arena of symbols rooted at [`SymbolId::ROOT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTree {
    symbols: Vec<Symbol>,
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTree {
    pub fn new() -> Self {
        let root = Symbol::new(
            SymbolKind::FreeText,
            "",
            TextRange::default(),
            Span::default(),
        );
        Self {
            symbols: vec![root],
        }
    }

    pub fn root(&self) -> SymbolId {
        SymbolId::ROOT
    }

    /// Number of symbols, not counting the root.
    pub fn len(&self) -> usize {
        self.symbols.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    /// Symbols owned directly by the root.
    pub fn top_level(&self) -> &[SymbolId] {
        &self.symbols[0].children
    }

    /// Direct children of a symbol. Unknown ids have none.
    pub fn children(&self, id: SymbolId) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.get(id)
            .map(|s| s.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| self.get(child).map(|s| (child, s)))
    }

    /// Every symbol except the root, in creation (source) order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Pre-order walk of everything below `id`.
    pub fn descendants(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut stack: Vec<SymbolId> = self
            .get(id)
            .map(|s| s.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(symbol) = self.get(next) {
                stack.extend(symbol.children.iter().rev().copied());
            }
        }
        out
    }

    /// Add `symbol` as the last child of `parent`.
    pub(crate) fn alloc(&mut self, mut symbol: Symbol, parent: SymbolId) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        symbol.parent = Some(parent);
        self.symbols.push(symbol);
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }
}

impl std::ops::Index<SymbolId> for SymbolTree {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}
