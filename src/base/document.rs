//! Document identity and immutable text snapshots.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
use smol_str::SmolStr;

/// Identity of an open document (typically its URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(SmolStr);

impl DocumentId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A versioned, immutable view of a document's full text.
///
/// This is the only input the analysis pipeline needs; it carries no
/// reference back to the editor's own document object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub version: i32,
    pub text: Arc<str>,
}

impl DocumentSnapshot {
    pub fn new(id: impl Into<DocumentId>, version: i32, text: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            version,
            text: text.into(),
        }
    }

    /// Content hash used together with the version to detect unchanged text.
    pub fn content_hash(&self) -> u64 {
        content_hash(&self.text)
    }
}

/// Hash document text with the crate-wide fast hasher.
pub(crate) fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}
