//! Semantic layer tests
//!
//! Tests for:
//! - Function signature table loading and lookup
//! - Validation rules and their categories
//! - Diagnostic ordering and structured context

pub mod tests_functions;
