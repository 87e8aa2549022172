//! Diagnostic types shared by the builder and the validation engine.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::position::Span;
use super::span::TextRange;

/// Severity level of a diagnostic.
///
/// Variants are declared most severe first, so the derived ordering sorts
/// errors ahead of warnings, information and hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Information => 3,
            Severity::Hint => 4,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
            Severity::Hint => "hint",
        }
    }
}

/// Category used by editors to group diagnostics.
///
/// The strings returned by [`DiagnosticCategory::as_str`] are part of the
/// published interface and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    SyntaxError,
    UnclosedBlock,
    MissingBranch,
    InvalidFunction,
    FieldReference,
    LodValidation,
    ConditionalLogic,
}

impl DiagnosticCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCategory::SyntaxError => "syntax-error",
            DiagnosticCategory::UnclosedBlock => "unclosed-block",
            DiagnosticCategory::MissingBranch => "missing-branch",
            DiagnosticCategory::InvalidFunction => "invalid-function",
            DiagnosticCategory::FieldReference => "field-reference",
            DiagnosticCategory::LodValidation => "LOD-validation",
            DiagnosticCategory::ConditionalLogic => "conditional-logic",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured data attached to a diagnostic for quick fixes and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticContext {
    /// Argument count outside the allowed range.
    Arity {
        function: SmolStr,
        /// Allowed range rendered as `"N"`, `"N+"` or `"N-M"`.
        expected: String,
        actual: usize,
    },
    /// Call to a name missing from the function table.
    UnknownFunction { name: SmolStr },
    /// Problem tied to a block or branch keyword.
    Block { keyword: SmolStr },
    /// Block nesting deeper than the configured limit.
    Nesting { depth: usize },
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte range in the document.
    pub range: TextRange,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed).
    pub start_col: u32,
    /// End line (0-indexed).
    pub end_line: u32,
    /// End column (0-indexed).
    pub end_col: u32,
    /// Severity level.
    pub severity: Severity,
    /// Grouping category.
    pub category: DiagnosticCategory,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Optional structured context.
    pub context: Option<DiagnosticContext>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        category: DiagnosticCategory,
        range: TextRange,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            range,
            start_line: span.start.line,
            start_col: span.start.column,
            end_line: span.end.line,
            end_col: span.end.column,
            severity,
            category,
            message: message.into(),
            context: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(
        category: DiagnosticCategory,
        range: TextRange,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Severity::Error, category, range, span, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        category: DiagnosticCategory,
        range: TextRange,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Severity::Warning, category, range, span, message)
    }

    /// Create a new information diagnostic.
    pub fn information(
        category: DiagnosticCategory,
        range: TextRange,
        span: Span,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(Severity::Information, category, range, span, message)
    }

    /// Attach structured context.
    pub fn with_context(mut self, context: DiagnosticContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The line/column span of this diagnostic.
    pub fn span(&self) -> Span {
        Span::from_coords(self.start_line, self.start_col, self.end_line, self.end_col)
    }
}

/// Sort by severity (errors first), then start line, then start column.
///
/// The sort is stable, so diagnostics at the same position keep the order in
/// which the rules produced them.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.severity, d.start_line, d.start_col));
}
