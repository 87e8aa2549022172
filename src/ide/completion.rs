//! Completion suggestions implementation.

use std::sync::Arc;

use crate::base::TextSize;
use crate::hir::{FunctionCategory, FunctionSignature, FunctionTable};
use crate::parser::keywords::KEYWORDS;
use crate::parser::{SyntaxKind, tokenize};

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Function,
    Keyword,
    Snippet,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Function => 3, // Function
            CompletionKind::Keyword => 14, // Keyword
            CompletionKind::Snippet => 15, // Snippet
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Text to insert (if different from label).
    pub insert_text: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Create a new completion item.
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_priority: 100,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Set the insert text.
    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Set the sort priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    /// Create from a function signature.
    pub fn from_signature(signature: &FunctionSignature) -> Self {
        let mut item = Self::new(signature.name.as_str(), CompletionKind::Function)
            .with_detail(signature.syntax.as_str())
            .with_insert_text(format!("{}(", signature.name))
            .with_priority(20);
        if !signature.description.is_empty() {
            item = item.with_documentation(signature.description.as_str());
        }
        item
    }
}

/// Block and LOD templates, in snippet syntax.
const SNIPPETS: &[(&str, &str, &str)] = &[
    (
        "IF",
        "IF ... THEN ... ELSE ... END",
        "IF ${1:condition} THEN\n\t${2:value}\nELSE\n\t${3:value}\nEND",
    ),
    (
        "CASE",
        "CASE ... WHEN ... THEN ... END",
        "CASE ${1:expression}\nWHEN ${2:value} THEN ${3:result}\nELSE ${4:result}\nEND",
    ),
    ("FIXED", "{FIXED ... : ...}", "{FIXED ${1:[dimension]} : ${2:aggregate}}"),
    ("INCLUDE", "{INCLUDE ... : ...}", "{INCLUDE ${1:[dimension]} : ${2:aggregate}}"),
    ("EXCLUDE", "{EXCLUDE ... : ...}", "{EXCLUDE ${1:[dimension]} : ${2:aggregate}}"),
];

/// Get completion suggestions at a byte offset.
///
/// Suggests keywords, snippets and table functions whose names start with
/// the identifier fragment before the cursor. Nothing is offered inside
/// strings, field references or comments.
pub fn completions(text: &str, offset: TextSize, table: &FunctionTable) -> Vec<CompletionItem> {
    let offset = offset.min(TextSize::of(text));
    if in_opaque_token(text, offset) {
        return Vec::new();
    }

    let prefix = identifier_prefix(text, offset).to_ascii_uppercase();
    let matches = |name: &str| name.starts_with(prefix.as_str());

    let mut items: Vec<CompletionItem> = Vec::new();

    for &(name, detail, body) in SNIPPETS {
        if matches(name) {
            items.push(
                CompletionItem::new(format!("{name} block"), CompletionKind::Snippet)
                    .with_detail(detail)
                    .with_insert_text(body)
                    .with_priority(10),
            );
        }
    }

    for &(name, _) in KEYWORDS {
        let upper = name.to_ascii_uppercase();
        if matches(upper.as_str()) {
            items.push(CompletionItem::new(upper, CompletionKind::Keyword).with_priority(30));
        }
    }

    items.extend(
        table
            .iter()
            .filter(|s| s.category != FunctionCategory::Construct && matches(s.name.as_str()))
            .map(CompletionItem::from_signature),
    );

    items.sort_by(|a, b| {
        a.sort_priority
            .cmp(&b.sort_priority)
            .then_with(|| a.label.cmp(&b.label))
    });
    items
}

/// The identifier characters immediately before `offset`.
fn identifier_prefix(text: &str, offset: TextSize) -> &str {
    let before = &text[..usize::from(offset)];
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    &before[start..]
}

/// Whether `offset` falls inside a string, field reference or comment.
fn in_opaque_token(text: &str, offset: TextSize) -> bool {
    let scanned = tokenize(text);
    let inside = |start: TextSize, end: TextSize, open_ended: bool| {
        start < offset && (offset < end || (open_ended && offset == end))
    };
    let in_comment = scanned.comments.iter().any(|range| {
        let line_comment = text[*range].starts_with("//");
        inside(range.start(), range.end(), line_comment)
    });
    in_comment
        || scanned.tokens.iter().any(|token| match token.kind {
            SyntaxKind::STRING | SyntaxKind::FIELD_REF => {
                inside(token.range.start(), token.range.end(), false)
            }
            // unterminated string, field or comment runs to its end
            SyntaxKind::UNEXPECTED if token.text.starts_with(['"', '\'', '[', '/']) => {
                inside(token.range.start(), token.range.end(), true)
            }
            _ => false,
        })
}
