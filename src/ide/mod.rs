//! IDE features — High-level APIs for editor integrations.
//!
//! This module sits on top of the symbol tree and the validation rules and
//! answers editor requests. Each function corresponds to an LSP request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **No LSP types**: Uses our own types, converted at the LSP boundary
//! 3. **Cached parses**: Requests share one `ParsedDocument` per version
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use calc::ide::AnalysisHost;
//! use calc::base::DocumentSnapshot;
//!
//! let host = AnalysisHost::new();
//! let snapshot = DocumentSnapshot::new("calc://margin", 1, "SUM([Profit]) / SUM([Sales])");
//!
//! let analysis = host.analysis(&snapshot)?;
//! let diagnostics = analysis.diagnostics();
//! ```

mod analysis;
mod cache;
mod completion;
mod config;
mod folding;
mod semantic_tokens;
mod signature_help;

pub use analysis::{Analysis, AnalysisHost};
pub use cache::{
    CacheConfig, CacheEntry, CacheError, DocumentCache, EvictionPolicy, ParsedDocument,
};
pub use completion::{CompletionItem, CompletionKind, completions};
pub use config::AnalysisConfig;
pub use folding::{FoldingKind, FoldingRange, folding_ranges};
pub use semantic_tokens::{
    SemanticToken, TokenType, encode_semantic_tokens, semantic_tokens, token_modifiers,
};
pub use signature_help::{SignatureHelp, signature_help};
