//! Symbol tree builder tests
//!
//! Tests for:
//! - Block structure and END linking
//! - Calls, arguments and LOD expressions
//! - Ownership and span invariants

pub mod tests_builder;
