//! Diagnostic collection for the validation engine.
//!
//! Rules report against the [`Symbol`] that triggered them; the collector
//! copies the symbol's range and line/column span into the diagnostic and
//! hands back a sorted list when validation finishes.

use std::sync::Arc;

use crate::base::{Diagnostic, DiagnosticCategory, DiagnosticContext, Severity, sort_diagnostics};
use crate::syntax::Symbol;

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during validation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a problem located at `symbol`.
    pub fn report(
        &mut self,
        severity: Severity,
        category: DiagnosticCategory,
        symbol: &Symbol,
        message: impl Into<Arc<str>>,
    ) -> &mut Diagnostic {
        self.diagnostics.push(Diagnostic::new(
            severity,
            category,
            symbol.range,
            symbol.span,
            message,
        ));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    /// Report an error located at `symbol`.
    pub fn error(
        &mut self,
        category: DiagnosticCategory,
        symbol: &Symbol,
        message: impl Into<Arc<str>>,
    ) -> &mut Diagnostic {
        self.report(Severity::Error, category, symbol, message)
    }

    /// Report a warning located at `symbol`.
    pub fn warning(
        &mut self,
        category: DiagnosticCategory,
        symbol: &Symbol,
        message: impl Into<Arc<str>>,
    ) -> &mut Diagnostic {
        self.report(Severity::Warning, category, symbol, message)
    }

    /// Report an information-level suggestion located at `symbol`.
    pub fn information(
        &mut self,
        category: DiagnosticCategory,
        symbol: &Symbol,
        message: impl Into<Arc<str>>,
    ) -> &mut Diagnostic {
        self.report(Severity::Information, category, symbol, message)
    }

    /// Add an unknown function warning.
    pub fn unknown_function(&mut self, call: &Symbol) {
        self.warning(
            DiagnosticCategory::InvalidFunction,
            call,
            format!("Unknown function '{}'", call.name),
        )
        .context = Some(DiagnosticContext::UnknownFunction {
            name: call.name.clone(),
        });
    }

    /// Add an argument count error.
    pub fn arity_mismatch(&mut self, call: &Symbol, expected: String, actual: usize) {
        let plural = if expected == "1" { "" } else { "s" };
        let message = format!(
            "{} expects {} argument{}, but got {}",
            call.name, expected, plural, actual
        );
        let context = DiagnosticContext::Arity {
            function: call.name.clone(),
            expected,
            actual,
        };
        self.error(DiagnosticCategory::InvalidFunction, call, message)
            .context = Some(context);
    }

    /// Add a diagnostic tied to a block or branch keyword.
    pub fn block(
        &mut self,
        severity: Severity,
        category: DiagnosticCategory,
        keyword: &Symbol,
        message: impl Into<Arc<str>>,
    ) {
        self.report(severity, category, keyword, message).context = Some(
            DiagnosticContext::Block {
                keyword: keyword.name.clone(),
            },
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Consume the collector, returning diagnostics sorted by severity then
    /// position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        sort_diagnostics(&mut self.diagnostics);
        self.diagnostics
    }
}
