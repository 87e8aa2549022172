//! IDE feature tests
//!
//! Tests for:
//! - Document cache and AnalysisHost lifecycle
//! - Code completion and signature help
//! - Semantic tokens
//! - Folding ranges

pub mod tests_cache;
pub mod tests_completion;
pub mod tests_folding;
