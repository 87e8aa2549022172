//! AnalysisHost and Analysis — Unified state management for editor features.
//!
//! The `AnalysisHost` owns the function table, the configuration and the
//! document cache, and hands out `Analysis` snapshots for querying one
//! document version.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::new();
//!
//! // Document opened or changed
//! let parsed = host.get_or_reparse("calc://profit", 3, text)?;
//! publish(parsed.diagnostics.clone());
//!
//! // Requests against the current snapshot
//! let analysis = host.analysis(&snapshot)?;
//! let items = analysis.completions(line, col);
//!
//! // Document closed
//! host.invalidate(&"calc://profit".into());
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::base::{
    Diagnostic, DocumentId, DocumentSnapshot, LineIndex, Position, TextSize, sort_diagnostics,
};
use crate::hir::{FunctionSignature, FunctionTable, validate};
use crate::syntax::{SymbolTree, build};

use super::cache::{CacheError, DocumentCache, EvictionPolicy, ParsedDocument};
use super::config::AnalysisConfig;
use super::{
    CompletionItem, FoldingRange, SemanticToken, SignatureHelp, completions, folding_ranges,
    semantic_tokens, signature_help,
};

/// Owns all shared state for the editor layer.
///
/// Every method takes `&self`; the host can be shared across threads and
/// requests for different documents run in parallel.
pub struct AnalysisHost {
    table: Arc<FunctionTable>,
    config: AnalysisConfig,
    cache: DocumentCache,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHost {
    /// Create a host with the built-in function table and default settings.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            table: Arc::new(FunctionTable::builtin()),
            cache: DocumentCache::new(config.cache.clone()),
            config,
        }
    }

    /// Replace the function table.
    pub fn with_function_table(mut self, table: impl Into<Arc<FunctionTable>>) -> Self {
        self.table = table.into();
        self
    }

    /// Load the function table from caller-supplied signatures.
    ///
    /// A table that fails to load is logged and the current table is kept.
    pub fn with_function_entries(
        self,
        entries: impl IntoIterator<Item = FunctionSignature>,
    ) -> Self {
        match FunctionTable::from_entries(entries) {
            Ok(table) => {
                debug!(functions = table.len(), "loaded function table");
                self.with_function_table(table)
            }
            Err(err) => {
                warn!(%err, "function table failed to load; keeping the current table");
                self
            }
        }
    }

    pub fn function_table(&self) -> &FunctionTable {
        &self.table
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    // ==================== Pipeline ====================

    /// Build the symbol tree. Diagnostics are lexical and structural only.
    pub fn parse(&self, snapshot: &DocumentSnapshot) -> (SymbolTree, Vec<Diagnostic>) {
        build(snapshot)
    }

    /// Run the validation rules over a tree built from `snapshot`.
    pub fn validate(&self, snapshot: &DocumentSnapshot, tree: &SymbolTree) -> Vec<Diagnostic> {
        validate(snapshot, tree, &self.table, &self.config.validation)
    }

    /// Full uncached pass: parse, validate, merge and sort diagnostics.
    pub fn analyze(&self, snapshot: &DocumentSnapshot) -> ParsedDocument {
        let (tree, mut diagnostics) = self.parse(snapshot);
        diagnostics.extend(self.validate(snapshot, &tree));
        sort_diagnostics(&mut diagnostics);
        debug!(
            document = %snapshot.id,
            version = snapshot.version,
            symbols = tree.len(),
            diagnostics = diagnostics.len(),
            "analyzed"
        );
        ParsedDocument {
            id: snapshot.id.clone(),
            version: snapshot.version,
            hash: snapshot.content_hash(),
            text: Arc::clone(&snapshot.text),
            tree,
            diagnostics,
        }
    }

    // ==================== Cache ====================

    /// Cached analysis of a document version.
    pub fn get_or_reparse(
        &self,
        id: impl Into<DocumentId>,
        version: i32,
        text: impl Into<Arc<str>>,
    ) -> Result<Arc<ParsedDocument>, CacheError> {
        self.get_or_reparse_snapshot(&DocumentSnapshot::new(id, version, text))
    }

    pub fn get_or_reparse_snapshot(
        &self,
        snapshot: &DocumentSnapshot,
    ) -> Result<Arc<ParsedDocument>, CacheError> {
        self.cache
            .get_or_reparse(snapshot, |snapshot| self.analyze(snapshot))
    }

    /// Analyze many documents in parallel. Results keep the input order.
    pub fn reparse_all(
        &self,
        snapshots: &[DocumentSnapshot],
    ) -> Vec<Result<Arc<ParsedDocument>, CacheError>> {
        snapshots
            .par_iter()
            .map(|snapshot| self.get_or_reparse_snapshot(snapshot))
            .collect()
    }

    /// Forget a closed document.
    pub fn invalidate(&self, id: &DocumentId) -> bool {
        self.cache.invalidate(id)
    }

    pub fn mark_active(&self, id: &DocumentId) {
        self.cache.mark_active(id);
    }

    pub fn mark_inactive(&self, id: &DocumentId) {
        self.cache.mark_inactive(id);
    }

    pub fn evict(&self, policy: EvictionPolicy) -> usize {
        self.cache.evict(policy)
    }

    pub fn shutdown(&self) {
        self.cache.shutdown();
    }

    /// Get a snapshot for querying one document version.
    pub fn analysis(&self, snapshot: &DocumentSnapshot) -> Result<Analysis<'_>, CacheError> {
        Ok(Analysis {
            parsed: self.get_or_reparse_snapshot(snapshot)?,
            table: &self.table,
        })
    }
}

/// An immutable view of one analyzed document version.
///
/// All editor queries go through this struct so they see the same parse.
pub struct Analysis<'a> {
    parsed: Arc<ParsedDocument>,
    table: &'a FunctionTable,
}

impl<'a> Analysis<'a> {
    pub fn parsed(&self) -> &Arc<ParsedDocument> {
        &self.parsed
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.parsed.diagnostics
    }

    pub fn tree(&self) -> &SymbolTree {
        &self.parsed.tree
    }

    /// Byte offset of a line/column position, if it is inside the text.
    pub fn offset(&self, line: u32, col: u32) -> Option<TextSize> {
        LineIndex::new(&self.parsed.text).offset(Position::new(line, col))
    }

    /// Get completions at a position.
    pub fn completions(&self, line: u32, col: u32) -> Vec<CompletionItem> {
        match self.offset(line, col) {
            Some(offset) => completions(&self.parsed.text, offset, self.table),
            None => Vec::new(),
        }
    }

    /// Get signature help at a position.
    pub fn signature_help(&self, line: u32, col: u32) -> Option<SignatureHelp> {
        let offset = self.offset(line, col)?;
        signature_help(&self.parsed.text, offset, self.table)
    }

    /// Get semantic tokens for the document.
    pub fn semantic_tokens(&self) -> Vec<SemanticToken> {
        semantic_tokens(&self.parsed, self.table)
    }

    /// Get folding ranges for the document.
    pub fn folding_ranges(&self) -> Vec<FoldingRange> {
        folding_ranges(&self.parsed)
    }
}
