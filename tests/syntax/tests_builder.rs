//! Symbol tree builder tests.

use calc::syntax::{TABLE_SCOPED_LOD, build, build_text};
use calc::{DocumentSnapshot, SymbolKind};

use crate::helpers::source_fixtures::*;
use crate::helpers::symbol_assertions::*;

// =============================================================================
// BLOCKS
// =============================================================================

#[test]
fn test_tiered_if_branches() {
    let tree = tree_for(TIERED_IF);
    let (block, symbol) = get_symbol(&tree, SymbolKind::Keyword, "IF");

    assert_eq!(
        branch_names(&tree, block),
        vec!["THEN", "ELSEIF", "THEN", "ELSE"]
    );
    assert_eq!(symbol.condition(), "[Sales] > 1000");
    let end = symbol.end.expect("IF is closed");
    assert_eq!(tree[end].span.start.line, 4);
}

#[test]
fn test_case_branches_and_condition() {
    let tree = tree_for(REGION_CASE);
    let (block, symbol) = get_symbol(&tree, SymbolKind::Keyword, "CASE");

    assert_eq!(
        branch_names(&tree, block),
        vec!["WHEN", "THEN", "WHEN", "THEN", "ELSE"]
    );
    assert_eq!(symbol.condition(), "[Region]");
    assert!(symbol.end.is_some());
}

#[test]
fn test_end_follows_block_start() {
    let tree = tree_for(DEEPLY_NESTED);
    for (_, block) in tree.iter().filter(|(_, s)| s.is_block()) {
        let end = block.end.expect("all blocks closed");
        assert!(tree[end].range.start() > block.range.start());
    }
}

#[test]
fn test_block_closed_inside_call_is_left_open() {
    let (tree, _) = build_text("ZN(IF [A] THEN 1) + 2");
    let (_, block) = get_symbol(&tree, SymbolKind::Keyword, "IF");
    assert_eq!(block.end, None);

    let (call, symbol) = get_symbol(&tree, SymbolKind::FunctionCall, "ZN");
    assert_eq!(symbol.arguments.len(), 1);
    assert_eq!(tree.children(call).count(), 1);
}

#[test]
fn test_stray_branch_is_root_keyword() {
    let (tree, diagnostics) = build_text("[A] THEN 1");
    assert!(diagnostics.is_empty());
    let (_, then) = get_symbol(&tree, SymbolKind::Keyword, "THEN");
    assert_eq!(then.parent, Some(tree.root()));
}

// =============================================================================
// CALLS AND LOD EXPRESSIONS
// =============================================================================

#[test]
fn test_nested_calls_are_children() {
    let tree = tree_for("ROUND(AVG([Price]) * 1.1, 2)");
    let (round, symbol) = get_symbol(&tree, SymbolKind::FunctionCall, "ROUND");
    let args: Vec<_> = symbol.arguments.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(args, vec!["AVG([Price]) * 1.1", "2"]);

    let (_, avg) = get_symbol(&tree, SymbolKind::FunctionCall, "AVG");
    assert_eq!(avg.parent, Some(round));
}

#[test]
fn test_argument_ranges_slice_source() {
    let text = "CONTAINS([Name], \"a, b\")";
    let tree = tree_for(text);
    let (_, call) = get_symbol(&tree, SymbolKind::FunctionCall, "CONTAINS");
    let slices: Vec<_> = call.arguments.iter().map(|a| &text[a.range]).collect();
    assert_eq!(slices, vec!["[Name]", "\"a, b\""]);
}

#[test]
fn test_lod_kinds() {
    let tree = tree_for("{INCLUDE [A] : SUM([S])} + {EXCLUDE [B] : AVG([S])} + {MAX([D])}");
    get_symbol(&tree, SymbolKind::LodExpression, "INCLUDE");
    get_symbol(&tree, SymbolKind::LodExpression, "EXCLUDE");
    let (_, table_scoped) = get_symbol(&tree, SymbolKind::LodExpression, TABLE_SCOPED_LOD);
    assert_eq!(table_scoped.detail, None);
}

#[test]
fn test_lod_inside_if_branch() {
    let tree = tree_for("IF [A] THEN {FIXED [C] : SUM([S])} END");
    let (then, _) = get_symbol(&tree, SymbolKind::Keyword, "THEN");
    let (_, lod) = get_symbol(&tree, SymbolKind::LodExpression, "FIXED");
    assert_eq!(lod.parent, Some(then));
    assert_eq!(lod.detail.as_deref(), Some("[C]"));
}

// =============================================================================
// FIELDS, NAMES, COMMENTS
// =============================================================================

#[test]
fn test_calculation_name_is_declaration() {
    let tree = tree_for(PROFIT_RATIO);
    get_symbol(&tree, SymbolKind::CalculationName, "PROFIT RATIO");
    assert_eq!(symbols_of_kind(&tree, SymbolKind::FunctionCall).len(), 2);
}

#[test]
fn test_colon_mid_line_is_not_a_name() {
    let tree = tree_for("{FIXED [A] : SUM([B])}");
    assert!(symbols_of_kind(&tree, SymbolKind::CalculationName).is_empty());
}

#[test]
fn test_field_names_are_canonical() {
    let tree = tree_for("[ order date ] + [Parameters].[Top N]");
    get_symbol(&tree, SymbolKind::FieldReference, "ORDER DATE");
    get_symbol(&tree, SymbolKind::ParameterReference, "TOP N");
}

#[test]
fn test_commented_constructs_produce_only_comments() {
    let tree = tree_for(COMMENTED);
    let comments = symbols_of_kind(&tree, SymbolKind::Comment);
    assert_eq!(comments.len(), 2);
    assert!(
        tree.iter()
            .all(|(_, s)| s.name != "IGNORED" && s.name != "SUM")
    );
}

// =============================================================================
// INVARIANTS
// =============================================================================

#[test]
fn test_every_symbol_has_one_owner() {
    for source in [TIERED_IF, REGION_CASE, DEEPLY_NESTED, COMMENTED, PROFIT_RATIO] {
        assert_single_ownership(&tree_for(source));
    }
    let (tree, _) = build_text("IF [A] THEN SUM([B] ELSE ) } END END");
    assert_single_ownership(&tree);
}

#[test]
fn test_build_from_snapshot_matches_text() {
    let snapshot = DocumentSnapshot::new("doc", 7, SIMPLE_IF);
    assert_eq!(build(&snapshot), build_text(SIMPLE_IF));
}
