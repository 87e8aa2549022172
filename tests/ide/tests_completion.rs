//! Completion and signature help tests.

use calc::ide::{AnalysisHost, CompletionKind, completions, signature_help};
use calc::{DocumentSnapshot, FunctionTable, TextSize};

fn labels_at_end(text: &str) -> Vec<String> {
    completions(text, TextSize::of(text), &FunctionTable::builtin())
        .into_iter()
        .map(|item| item.label.to_string())
        .collect()
}

// =============================================================================
// COMPLETION
// =============================================================================

#[test]
fn test_snippets_sort_before_keywords_and_functions() {
    let host = AnalysisHost::new();
    let items = completions("I", TextSize::from(1), host.function_table());
    let kinds: Vec<_> = items.iter().map(|i| i.kind).collect();

    let first_keyword = kinds.iter().position(|k| *k == CompletionKind::Keyword);
    let first_function = kinds.iter().position(|k| *k == CompletionKind::Function);
    assert_eq!(kinds[0], CompletionKind::Snippet);
    assert!(first_function < first_keyword);
    assert!(items.iter().any(|i| i.label.as_ref() == "IIF"));
    assert!(items.iter().any(|i| i.label.as_ref() == "INCLUDE block"));
}

#[test]
fn test_block_constructs_are_not_offered_as_functions() {
    let items = labels_at_end("CAS");
    assert_eq!(items, vec!["CASE block", "CASE"]);
}

#[test]
fn test_completion_inside_call_arguments() {
    let items = labels_at_end("SUM(ZN([Sales]) + ABS");
    assert!(items.contains(&"ABS".to_string()));
}

#[test]
fn test_custom_table_drives_completion() {
    let host = AnalysisHost::new().with_function_entries([
        calc::hir::FunctionSignature::new("REGEX_SCORE", 1, Some(1))
            .with_syntax("REGEX_SCORE(text)"),
    ]);
    let items = completions("REGEX", TextSize::from(5), host.function_table());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].detail.as_deref(), Some("REGEX_SCORE(text)"));
}

#[test]
fn test_analysis_completions_by_line_and_column() {
    let host = AnalysisHost::new();
    let snapshot = DocumentSnapshot::new("a.calc", 1, "IF [A] THEN\n  UPP");
    let analysis = host.analysis(&snapshot).unwrap();
    let labels: Vec<_> = analysis
        .completions(1, 5)
        .into_iter()
        .map(|i| i.label.to_string())
        .collect();
    assert_eq!(labels, vec!["UPPER"]);
}

// =============================================================================
// SIGNATURE HELP
// =============================================================================

#[test]
fn test_signature_help_documentation() {
    let text = "DATEADD('month', ";
    let help = signature_help(text, TextSize::of(text), &FunctionTable::builtin()).unwrap();
    assert_eq!(help.label.as_ref(), "DATEADD(date_part, interval, date)");
    let parameters: Vec<_> = help.parameters.iter().map(|p| p.as_ref()).collect();
    assert_eq!(parameters, vec!["date_part", "interval", "date"]);
    assert_eq!(help.active_parameter, 1);
    assert!(help.documentation.is_some());
}

#[test]
fn test_signature_help_inside_lod() {
    let text = "{FIXED [Region] : MAX([Sales], ";
    let help = signature_help(text, TextSize::of(text), &FunctionTable::builtin()).unwrap();
    assert_eq!(help.name.as_ref(), "MAX");
    assert_eq!(help.active_parameter, 1);
}

#[test]
fn test_signature_help_outside_closed_call() {
    let text = "LEFT([Name], 2) ";
    assert!(signature_help(text, TextSize::of(text), &FunctionTable::builtin()).is_none());
}
