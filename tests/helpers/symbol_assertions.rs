//! Symbol tree helpers.

use calc::syntax::{SymbolTree, build_text};
use calc::{Symbol, SymbolId, SymbolKind};

/// Build a tree, asserting the builder reported nothing.
pub fn tree_for(source: &str) -> SymbolTree {
    let (tree, diagnostics) = build_text(source);
    assert!(
        diagnostics.is_empty(),
        "Builder diagnostics for {:?}: {:?}",
        source,
        diagnostics
    );
    tree
}

/// All symbols of one kind, in source order.
pub fn symbols_of_kind(tree: &SymbolTree, kind: SymbolKind) -> Vec<(SymbolId, &Symbol)> {
    tree.iter().filter(|(_, s)| s.kind == kind).collect()
}

/// The single symbol with the given kind and name.
pub fn get_symbol<'a>(tree: &'a SymbolTree, kind: SymbolKind, name: &str) -> (SymbolId, &'a Symbol) {
    let mut found = tree.iter().filter(|(_, s)| s.kind == kind && s.name == name);
    let first = found
        .next()
        .unwrap_or_else(|| panic!("Expected {:?} '{}' to exist", kind, name));
    assert!(
        found.next().is_none(),
        "Expected exactly one {:?} '{}'",
        kind,
        name
    );
    first
}

/// Names of the branch keywords owned by a block, in order.
pub fn branch_names(tree: &SymbolTree, block: SymbolId) -> Vec<String> {
    tree.children(block)
        .filter(|(_, s)| s.is_branch())
        .map(|(_, s)| s.name.to_string())
        .collect()
}

/// Assert no symbol is owned by more than one parent.
pub fn assert_single_ownership(tree: &SymbolTree) {
    let mut seen = std::collections::HashSet::new();
    for (_, symbol) in tree.iter().chain(std::iter::once((tree.root(), &tree[tree.root()]))) {
        for child in &symbol.children {
            assert!(seen.insert(*child), "Symbol {:?} has two owners", child);
        }
    }
    assert_eq!(seen.len(), tree.len());
}
