//! Validation engine — structural and usage checks over a symbol tree.
//!
//! Validation is a pure function of the tree: no state survives a call, and
//! the result is sorted so rule evaluation order never leaks out.
//!
//! ```text
//! SymbolTree ─► walk every symbol
//!                 ├─ blocks:    unclosed, IF branch order, CASE branches
//!                 ├─ branches:  stray keywords, empty branches
//!                 ├─ END:       unmatched terminators
//!                 ├─ calls:     unknown names, arity, IIF heuristic
//!                 ├─ fields:    malformed names
//!                 └─ LOD:       missing aggregate
//!             ─► outermost blocks: nesting depth
//! ```

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::base::{Diagnostic, DiagnosticCategory, DiagnosticContext, DocumentSnapshot, Severity};
use crate::parser::{SyntaxKind, tokenize};
use crate::syntax::{Symbol, SymbolId, SymbolKind, SymbolTree};

use super::diagnostics::DiagnosticCollector;
use super::functions::FunctionTable;

// ============================================================================
// OPTIONS
// ============================================================================

/// Tunables for [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationOptions {
    /// Deepest IF/CASE nesting accepted without a suggestion.
    pub max_nesting_depth: usize,
    /// Run the function-table rules. Off when no table could be loaded.
    pub check_functions: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 3,
            check_functions: true,
        }
    }
}

impl ValidationOptions {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_check_functions(mut self, enabled: bool) -> Self {
        self.check_functions = enabled;
        self
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Validate the symbol tree built from `snapshot`.
pub fn validate(
    snapshot: &DocumentSnapshot,
    tree: &SymbolTree,
    table: &FunctionTable,
    options: &ValidationOptions,
) -> Vec<Diagnostic> {
    let diagnostics = Validator::new(tree, table, options).run();
    debug!(
        document = %snapshot.id,
        version = snapshot.version,
        count = diagnostics.len(),
        "validated"
    );
    diagnostics
}

struct Validator<'a> {
    tree: &'a SymbolTree,
    table: &'a FunctionTable,
    options: &'a ValidationOptions,
    /// END symbols linked from some block.
    matched_ends: FxHashSet<SymbolId>,
    out: DiagnosticCollector,
}

impl<'a> Validator<'a> {
    fn new(tree: &'a SymbolTree, table: &'a FunctionTable, options: &'a ValidationOptions) -> Self {
        let matched_ends = tree.iter().filter_map(|(_, s)| s.end).collect();
        Self {
            tree,
            table,
            options,
            matched_ends,
            out: DiagnosticCollector::new(),
        }
    }

    fn run(mut self) -> Vec<Diagnostic> {
        let tree = self.tree;
        for id in tree.descendants(tree.root()) {
            self.check_symbol(id, &tree[id]);
        }
        self.check_nesting();
        self.out.finish()
    }

    fn check_symbol(&mut self, id: SymbolId, symbol: &Symbol) {
        match symbol.kind {
            SymbolKind::Keyword if symbol.is_block() => {
                self.check_unclosed(symbol);
                if symbol.name == "IF" {
                    self.check_if(id, symbol);
                } else {
                    self.check_case(id, symbol);
                }
            }
            SymbolKind::Keyword if symbol.is_branch() => self.check_stray_branch(symbol),
            SymbolKind::Keyword if symbol.is_end() => {
                if !self.matched_ends.contains(&id) {
                    self.out.error(
                        DiagnosticCategory::SyntaxError,
                        symbol,
                        "END without a matching IF or CASE",
                    );
                }
            }
            SymbolKind::FunctionCall if self.options.check_functions => self.check_call(symbol),
            SymbolKind::FieldReference => self.check_field(symbol),
            SymbolKind::LodExpression => self.check_lod(id, symbol),
            _ => {}
        }
    }

    fn has_meaningful_children(&self, id: SymbolId) -> bool {
        self.tree.children(id).any(|(_, child)| child.is_meaningful())
    }

    /// Branch keywords of a block, in source order.
    fn branches(&self, block: SymbolId) -> Vec<(SymbolId, &'a Symbol)> {
        let tree = self.tree;
        tree.children(block).filter(|(_, s)| s.is_branch()).collect()
    }

    // ========================================================================
    // BLOCKS
    // ========================================================================

    fn check_unclosed(&mut self, block: &Symbol) {
        // A block with no children yet is still being typed.
        if block.end.is_none() && !block.children.is_empty() {
            self.out.block(
                Severity::Error,
                DiagnosticCategory::UnclosedBlock,
                block,
                format!("{} block is missing END", block.name),
            );
        }
    }

    fn check_stray_branch(&mut self, branch: &Symbol) {
        let inside_block = branch
            .parent
            .and_then(|p| self.tree.get(p))
            .is_some_and(Symbol::is_block);
        if !inside_block {
            self.out.block(
                Severity::Error,
                DiagnosticCategory::SyntaxError,
                branch,
                format!("{} without a matching IF or CASE", branch.name),
            );
        }
    }

    fn check_empty_branch(&mut self, id: SymbolId, branch: &Symbol) {
        if !self.has_meaningful_children(id) {
            self.out.block(
                Severity::Warning,
                DiagnosticCategory::MissingBranch,
                branch,
                format!("{} branch is empty", branch.name),
            );
        }
    }

    fn check_if(&mut self, id: SymbolId, block: &Symbol) {
        let branches = self.branches(id);
        let position = |name: &str| branches.iter().position(|(_, b)| b.name == name);

        let first_then = position("THEN");
        let first_else = position("ELSE");
        let elseif_count = branches.iter().filter(|(_, b)| b.name == "ELSEIF").count();

        if let Some(first_elseif) = position("ELSEIF") {
            let then_before = branches[..first_elseif].iter().any(|(_, b)| b.name == "THEN");
            if !then_before {
                let (_, elseif) = branches[first_elseif];
                self.out.block(
                    Severity::Error,
                    DiagnosticCategory::ConditionalLogic,
                    elseif,
                    "ELSEIF without a preceding THEN",
                );
            }
        }

        if let Some(else_index) = first_else {
            let (_, else_branch) = branches[else_index];
            if first_then.is_none() && elseif_count == 0 && self.looks_complex(id, block) {
                self.out.block(
                    Severity::Warning,
                    DiagnosticCategory::ConditionalLogic,
                    else_branch,
                    "ELSE without THEN; this condition probably needs a THEN branch",
                );
            }
        }

        // A THEN right after ELSEIF closes that ELSEIF's condition.
        let misplaced_then = branches
            .windows(2)
            .find(|pair| pair[1].1.name == "THEN" && pair[0].1.name != "ELSEIF")
            .map(|pair| pair[1]);
        if let Some((_, then)) = misplaced_then {
            self.out.block(
                Severity::Error,
                DiagnosticCategory::ConditionalLogic,
                then,
                "THEN must be the first branch of IF",
            );
        }

        if elseif_count >= 2 && first_else.is_none() {
            self.out.block(
                Severity::Information,
                DiagnosticCategory::MissingBranch,
                block,
                "Consider adding an ELSE branch to handle remaining cases",
            );
        }

        if let Some(else_index) = first_else {
            let (_, else_branch) = branches[else_index];
            let mut else_not_last = false;
            let mut previous = "ELSE";
            for &(_, branch) in &branches[else_index + 1..] {
                match branch.name.as_str() {
                    "ELSEIF" => self.out.block(
                        Severity::Error,
                        DiagnosticCategory::ConditionalLogic,
                        branch,
                        "ELSEIF cannot follow ELSE",
                    ),
                    // THEN closing an ELSEIF condition belongs to that ELSEIF.
                    "THEN" if previous == "ELSEIF" => {}
                    _ => else_not_last = true,
                }
                previous = branch.name.as_str();
            }
            if else_not_last {
                self.out.block(
                    Severity::Error,
                    DiagnosticCategory::ConditionalLogic,
                    else_branch,
                    "ELSE must be the last branch of IF",
                );
            }
        }

        for (branch_id, branch) in branches {
            if matches!(branch.name.as_str(), "THEN" | "ELSEIF" | "ELSE") {
                self.check_empty_branch(branch_id, branch);
            }
        }
    }

    /// Whether an IF condition is involved enough that an ELSE without THEN
    /// is probably a mistake.
    fn looks_complex(&self, id: SymbolId, block: &Symbol) -> bool {
        let scanned = tokenize(block.condition());
        let logical = scanned.tokens.iter().any(|t| t.kind.is_logical());
        let comparisons = scanned
            .tokens
            .iter()
            .filter(|t| t.kind.is_comparison())
            .count();
        logical || comparisons > 1 || self.tree.children(id).count() > 2
    }

    fn check_case(&mut self, id: SymbolId, block: &Symbol) {
        let branches = self.branches(id);
        let when_count = branches.iter().filter(|(_, b)| b.name == "WHEN").count();
        let has_else = branches.iter().any(|(_, b)| b.name == "ELSE");

        if when_count == 0 {
            self.out.block(
                Severity::Error,
                DiagnosticCategory::MissingBranch,
                block,
                "CASE requires at least one WHEN branch",
            );
        }

        for &(branch_id, branch) in &branches {
            if branch.name == "WHEN" {
                if !self.has_meaningful_children(branch_id) {
                    self.out.block(
                        Severity::Error,
                        DiagnosticCategory::MissingBranch,
                        branch,
                        "WHEN branch is missing a value",
                    );
                }
            } else {
                self.check_empty_branch(branch_id, branch);
            }
        }

        if when_count >= 2 && !has_else {
            self.out.block(
                Severity::Warning,
                DiagnosticCategory::MissingBranch,
                block,
                "CASE has no ELSE branch; unmatched values return NULL",
            );
        }
    }

    /// Depth of block nesting at and below `id`.
    fn block_depth(&self, id: SymbolId) -> usize {
        let own = usize::from(self.tree[id].is_block());
        let deepest = self
            .tree
            .children(id)
            .map(|(child, _)| self.block_depth(child))
            .max()
            .unwrap_or(0);
        own + deepest
    }

    fn has_block_ancestor(&self, symbol: &Symbol) -> bool {
        let mut parent = symbol.parent;
        while let Some(id) = parent {
            let Some(ancestor) = self.tree.get(id) else { break };
            if ancestor.is_block() {
                return true;
            }
            parent = ancestor.parent;
        }
        false
    }

    fn check_nesting(&mut self) {
        let tree = self.tree;
        let limit = self.options.max_nesting_depth;
        for (id, block) in tree.iter() {
            if !block.is_block() || self.has_block_ancestor(block) {
                continue;
            }
            let depth = self.block_depth(id);
            if depth > limit {
                self.out
                    .information(
                        DiagnosticCategory::ConditionalLogic,
                        block,
                        format!(
                            "Conditional nested {depth} levels deep (limit {limit}); consider simplifying"
                        ),
                    )
                    .context = Some(DiagnosticContext::Nesting { depth });
            }
        }
    }

    // ========================================================================
    // CALLS, FIELDS, LOD EXPRESSIONS
    // ========================================================================

    fn check_call(&mut self, call: &Symbol) {
        let Some(signature) = self.table.get(&call.name) else {
            self.out.unknown_function(call);
            return;
        };

        let actual = call.arguments.len();
        if !signature.accepts(actual) {
            self.out.arity_mismatch(call, signature.arity_label(), actual);
        }

        if call.name == "IIF" && actual >= 3 && is_numeric_literal(&call.arguments[0].text) {
            self.out.warning(
                DiagnosticCategory::ConditionalLogic,
                call,
                "IIF test is a number; expected a boolean expression",
            );
        }
    }

    fn check_field(&mut self, field: &Symbol) {
        // A qualified `[Table].[Field]` keeps its qualifier in `detail`.
        let parts = match field.detail.as_deref() {
            Some(qualifier) => {
                let rest = field
                    .name
                    .get(qualifier.len() + 1..)
                    .unwrap_or_default();
                vec![qualifier, rest]
            }
            None => vec![field.name.as_str()],
        };
        let suspicious = parts
            .into_iter()
            .find(|part| part.contains("..") || part.starts_with('.'));
        if let Some(part) = suspicious {
            self.out.warning(
                DiagnosticCategory::FieldReference,
                field,
                format!("Suspicious field name '{part}'"),
            );
        }
    }

    fn check_lod(&mut self, id: SymbolId, lod: &Symbol) {
        if !self.has_meaningful_children(id) {
            self.out.error(
                DiagnosticCategory::LodValidation,
                lod,
                format!("{} expression has no aggregate", lod.name),
            );
        }
    }
}

/// A single bare number such as `1` or `0.5`.
fn is_numeric_literal(text: &str) -> bool {
    let scanned = tokenize(text);
    matches!(
        scanned.tokens.as_slice(),
        [number, eof] if number.kind == SyntaxKind::NUMBER && eof.kind == SyntaxKind::EOF
    )
}
