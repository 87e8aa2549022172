//! Token scanner for the calculation language
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind, comment ranges on the side
//!     ↓
//! Symbol Tree Builder (syntax) → arena of Symbols
//!     ↓
//! Validation (hir) → Diagnostics
//! ```
//!
//! The scanner never fails: anything it cannot classify becomes an
//! `UNEXPECTED` token, because half-typed calculations are the normal state
//! of a document being edited.

pub mod keywords;
mod lexer;
mod syntax_kind;

pub use lexer::{Lexer, Token, Tokens, tokenize};
pub use syntax_kind::SyntaxKind;
