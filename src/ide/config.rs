//! Analysis configuration

use crate::hir::ValidationOptions;

use super::cache::CacheConfig;

/// Settings for an [`AnalysisHost`](super::AnalysisHost).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Parse cache budget
    pub cache: CacheConfig,
    /// Validation tunables
    pub validation: ValidationOptions,
}

impl AnalysisConfig {
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }
}
