//! Diagnostic assertion helpers.

use calc::ide::AnalysisHost;
use calc::{Diagnostic, DiagnosticCategory, DocumentSnapshot, Severity};

/// Get all diagnostics for a calculation, builder and validation merged.
pub fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
    AnalysisHost::new()
        .analyze(&DocumentSnapshot::new("test.calc", 1, source))
        .diagnostics
}

/// Get only error-level diagnostics.
pub fn errors_for(source: &str) -> Vec<Diagnostic> {
    diagnostics_for(source)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect()
}

/// Diagnostics of one category.
pub fn in_category(source: &str, category: DiagnosticCategory) -> Vec<Diagnostic> {
    diagnostics_for(source)
        .into_iter()
        .filter(|d| d.category == category)
        .collect()
}

/// Messages only, in sorted order.
pub fn messages_for(source: &str) -> Vec<String> {
    diagnostics_for(source)
        .iter()
        .map(|d| d.message.to_string())
        .collect()
}

/// Assert a source has no diagnostics at all.
pub fn assert_clean(source: &str) {
    let diagnostics = diagnostics_for(source);
    assert!(
        diagnostics.is_empty(),
        "Expected no diagnostics for {:?}, got {}:\n{}",
        source,
        diagnostics.len(),
        diagnostics
            .iter()
            .map(|d| format!("  Line {}: [{}] {}", d.start_line + 1, d.category.as_str(), d.message))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_clean_passes_for_valid_source() {
        assert_clean("SUM([Sales])");
    }

    #[test]
    fn test_errors_for_filters_severity() {
        assert!(errors_for("NOTAFUNC(1)").is_empty());
        assert_eq!(errors_for("LEFT([Name])").len(), 1);
    }
}
