//! # calc-base
//!
//! Core library for analyzing calculations written in a tabular-analytics
//! formula language: IF/CASE blocks, LOD expressions and function calls.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Editor features (cache, completion, semantic tokens, folding)
//!   ↓
//! hir       → Function signature table, validation rules
//!   ↓
//! syntax    → Symbol tree builder, Symbol/SymbolTree arena
//!   ↓
//! parser    → Logos token scanner, SyntaxKind, keywords
//!   ↓
//! base      → Primitives (DocumentSnapshot, Diagnostic, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → ide)
// ============================================================================

/// Foundation types: documents, diagnostics, positions
pub mod base;

/// Parser: Logos token scanner
pub mod parser;

/// Syntax: symbol tree and its builder
pub mod syntax;

/// Semantic layer: function table and validation
pub mod hir;

/// IDE features: parse cache, completion, signature help, semantic tokens
pub mod ide;

// Re-export commonly needed items
pub use parser::keywords;

// Re-export foundation types
pub use base::{
    Diagnostic, DiagnosticCategory, DocumentId, DocumentSnapshot, LineCol, LineIndex, Position,
    Severity, Span, TextRange, TextSize,
};
pub use hir::{FunctionTable, ValidationOptions};
pub use ide::{AnalysisHost, ParsedDocument};
pub use syntax::{Symbol, SymbolId, SymbolKind, SymbolTree};

/// Build and validate `text` with the built-in function table.
///
/// Convenience for one-off checks; editors should go through [`AnalysisHost`]
/// so parses are cached.
pub fn check(text: &str) -> Vec<Diagnostic> {
    AnalysisHost::new()
        .analyze(&DocumentSnapshot::new("calc://inline", 0, text))
        .diagnostics
}
