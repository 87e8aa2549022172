//! Token scanner tests
//!
//! Tests for:
//! - Token kinds and keyword recognition
//! - Line/column tracking
//! - Comments and unterminated constructs

pub mod tests_lexer;
