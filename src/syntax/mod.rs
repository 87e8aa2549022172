//! Symbol layer: the hierarchical view of a calculation.
//!
//! [`build`] turns the token stream into a [`SymbolTree`], an arena of
//! [`Symbol`]s where blocks own their branches, calls own their argument
//! constructs and LOD expressions own their aggregate.

mod builder;
mod symbol;

pub use builder::{TABLE_SCOPED_LOD, build, build_text};
pub use symbol::{ArgumentSymbol, Symbol, SymbolId, SymbolKind, SymbolTree};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
