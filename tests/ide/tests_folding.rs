//! Folding range tests.

use calc::ide::{AnalysisHost, FoldingKind, folding_ranges};
use calc::DocumentSnapshot;

use crate::helpers::source_fixtures::*;

fn folds(text: &str) -> Vec<(u32, u32, FoldingKind)> {
    let parsed = AnalysisHost::new().analyze(&DocumentSnapshot::new("t.calc", 1, text));
    folding_ranges(&parsed)
        .into_iter()
        .map(|r| (r.start_line, r.end_line, r.kind))
        .collect()
}

#[test]
fn test_tiered_if_folds_to_end() {
    assert_eq!(folds(TIERED_IF), vec![(1, 4, FoldingKind::Region)]);
}

#[test]
fn test_nested_blocks_each_fold() {
    let ranges = folds(DEEPLY_NESTED);
    assert_eq!(ranges.len(), 3);
    assert_eq!(ranges[0], (1, 7, FoldingKind::Region));
    assert!(ranges.iter().all(|(start, end, _)| end > start));
}

#[test]
fn test_single_line_constructs_do_not_fold() {
    assert!(folds(FIXED_LOD).is_empty());
    assert!(folds(COMMENTED).is_empty());
}

#[test]
fn test_kind_strings() {
    assert_eq!(FoldingKind::Region.as_str(), "region");
    assert_eq!(FoldingKind::Comment.as_str(), "comment");
}
