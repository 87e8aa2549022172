//! Per-document parse cache.
//!
//! ```text
//! get_or_reparse(snapshot)
//!     │
//!     ├─ version + hash match ──► stored Arc (hit)
//!     │
//!     └─ otherwise ──► parse (lock released) ──► store unless a newer
//!                                                version landed or the
//!                                                document was closed
//!                                                meanwhile
//! ```
//!
//! One mutex guards the whole map; there are no multi-document operations.
//! Parsing runs outside the lock, so documents are analyzed concurrently and
//! a slow parse never blocks lookups for other documents.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::base::{Diagnostic, DocumentId, DocumentSnapshot};
use crate::syntax::SymbolTree;

// ============================================================================
// PARSED DOCUMENT
// ============================================================================

/// Result of one full parse and validation pass over a snapshot.
///
/// Replaced wholesale whenever the document changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub id: DocumentId,
    pub version: i32,
    /// Content hash of `text`.
    pub hash: u64,
    pub text: Arc<str>,
    pub tree: SymbolTree,
    /// Builder and validation diagnostics, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedDocument {
    /// Rough heap footprint, used by size-based eviction.
    pub fn approximate_size(&self) -> usize {
        self.text.len()
            + self.tree.len() * std::mem::size_of::<crate::syntax::Symbol>()
            + self.diagnostics.len() * std::mem::size_of::<Diagnostic>()
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Budget enforced after every store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Maximum number of cached documents.
    pub max_entries: usize,
    /// Maximum approximate size of all cached documents, in bytes.
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

impl CacheConfig {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// How [`DocumentCache::evict`] chooses entries to drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Drop least recently used documents until at most `max_entries` remain.
    LeastRecentlyUsed { max_entries: usize },
    /// Drop least recently used documents until the total size fits.
    Size { max_bytes: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("document cache has been shut down")]
    ShutDown,
}

// ============================================================================
// CACHE
// ============================================================================

/// A stored parse result and its bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub version: i32,
    pub hash: u64,
    pub parsed: Arc<ParsedDocument>,
    /// Logical clock value of the last hit or store.
    pub last_access: u64,
    pub size: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: FxHashMap<DocumentId, CacheEntry>,
    active: FxHashSet<DocumentId>,
    /// Bumped by every invalidation of a document.
    generations: FxHashMap<DocumentId, u64>,
    tick: u64,
    total_bytes: usize,
    shut_down: bool,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn generation(&self, id: &DocumentId) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    fn remove(&mut self, id: &DocumentId) -> bool {
        match self.entries.remove(id) {
            Some(entry) => {
                self.total_bytes -= entry.size;
                true
            }
            None => false,
        }
    }

    /// Inactive documents, least recently used first.
    fn eviction_order(&self) -> Vec<(u64, DocumentId)> {
        let mut candidates: Vec<_> = self
            .entries
            .iter()
            .filter(|(id, _)| !self.active.contains(*id))
            .map(|(id, entry)| (entry.last_access, id.clone()))
            .collect();
        candidates.sort_unstable_by_key(|(tick, _)| *tick);
        candidates
    }

    fn evict(&mut self, policy: EvictionPolicy) -> usize {
        let over_budget = |state: &CacheState| match policy {
            EvictionPolicy::LeastRecentlyUsed { max_entries } => state.entries.len() > max_entries,
            EvictionPolicy::Size { max_bytes } => state.total_bytes > max_bytes,
        };
        if !over_budget(self) {
            return 0;
        }

        let mut evicted = 0;
        for (_, id) in self.eviction_order() {
            if !over_budget(self) {
                break;
            }
            if self.remove(&id) {
                debug!(document = %id, ?policy, "evicted");
                evicted += 1;
            }
        }
        evicted
    }
}

/// Versioned cache of [`ParsedDocument`]s keyed by document identity.
///
/// Constructed once and shared by reference. After [`shutdown`] every
/// request fails with [`CacheError::ShutDown`].
///
/// [`shutdown`]: DocumentCache::shutdown
#[derive(Debug, Default)]
pub struct DocumentCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl DocumentCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached result for `snapshot`, or run `parse` and store it.
    ///
    /// A hit requires both the version and the content hash to match. When a
    /// newer version of the document was stored, or the document was
    /// invalidated, while `parse` ran, the fresh result is returned to this
    /// caller but not stored.
    pub fn get_or_reparse<F>(
        &self,
        snapshot: &DocumentSnapshot,
        parse: F,
    ) -> Result<Arc<ParsedDocument>, CacheError>
    where
        F: FnOnce(&DocumentSnapshot) -> ParsedDocument,
    {
        let hash = snapshot.content_hash();
        let generation = {
            let mut state = self.state.lock();
            if state.shut_down {
                return Err(CacheError::ShutDown);
            }
            let tick = state.next_tick();
            if let Some(entry) = state.entries.get_mut(&snapshot.id) {
                if entry.version == snapshot.version && entry.hash == hash {
                    entry.last_access = tick;
                    debug!(document = %snapshot.id, version = snapshot.version, "cache hit");
                    return Ok(Arc::clone(&entry.parsed));
                }
            }
            state.generation(&snapshot.id)
        };

        debug!(document = %snapshot.id, version = snapshot.version, "cache miss, reparsing");
        let parsed = Arc::new(parse(snapshot));

        let mut state = self.state.lock();
        if state.shut_down {
            return Err(CacheError::ShutDown);
        }
        let newer_stored = state
            .entries
            .get(&snapshot.id)
            .is_some_and(|entry| entry.version > snapshot.version);
        if newer_stored {
            debug!(document = %snapshot.id, version = snapshot.version, "stale result not stored");
            return Ok(parsed);
        }
        if state.generation(&snapshot.id) != generation {
            debug!(document = %snapshot.id, version = snapshot.version, "closed during parse, not stored");
            return Ok(parsed);
        }

        let tick = state.next_tick();
        let size = parsed.approximate_size();
        state.remove(&snapshot.id);
        state.total_bytes += size;
        state.entries.insert(
            snapshot.id.clone(),
            CacheEntry {
                version: snapshot.version,
                hash,
                parsed: Arc::clone(&parsed),
                last_access: tick,
                size,
            },
        );

        state.evict(EvictionPolicy::LeastRecentlyUsed {
            max_entries: self.config.max_entries,
        });
        state.evict(EvictionPolicy::Size {
            max_bytes: self.config.max_bytes,
        });
        Ok(parsed)
    }

    /// The stored result for `id`, without touching recency.
    pub fn get(&self, id: &DocumentId) -> Option<Arc<ParsedDocument>> {
        let state = self.state.lock();
        state.entries.get(id).map(|entry| Arc::clone(&entry.parsed))
    }

    /// Drop the entry for a closed document. Returns whether one existed.
    pub fn invalidate(&self, id: &DocumentId) -> bool {
        let mut state = self.state.lock();
        state.active.remove(id);
        *state.generations.entry(id.clone()).or_insert(0) += 1;
        let removed = state.remove(id);
        if removed {
            debug!(document = %id, "invalidated");
        }
        removed
    }

    /// Protect a document from pressure eviction while it is visible.
    pub fn mark_active(&self, id: &DocumentId) {
        self.state.lock().active.insert(id.clone());
    }

    pub fn mark_inactive(&self, id: &DocumentId) {
        self.state.lock().active.remove(id);
    }

    pub fn is_active(&self, id: &DocumentId) -> bool {
        self.state.lock().active.contains(id)
    }

    /// Run one eviction sweep. Returns how many entries were dropped.
    pub fn evict(&self, policy: EvictionPolicy) -> usize {
        self.state.lock().evict(policy)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.state.lock().entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate size of all stored results.
    pub fn total_bytes(&self) -> usize {
        self.state.lock().total_bytes
    }

    /// Drop everything and refuse further requests.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        state.active.clear();
        state.generations.clear();
        state.total_bytes = 0;
        state.shut_down = true;
        debug!(dropped, "document cache shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }
}
