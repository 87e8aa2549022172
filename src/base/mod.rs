//! Foundation types for the calculation toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentId`], [`DocumentSnapshot`] - Document identity and immutable text snapshots
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for symbols and diagnostics
//! - [`Diagnostic`], [`Severity`], [`DiagnosticCategory`] - Reported problems
//!
//! This module has NO dependencies on other crate modules.

mod diagnostic;
mod document;
mod position;
mod span;

pub use diagnostic::{
    Diagnostic, DiagnosticCategory, DiagnosticContext, Severity, sort_diagnostics,
};
pub use document::{DocumentId, DocumentSnapshot};
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
