//! Semantic layer — function signatures and validation.
//!
//! ## Key Types
//!
//! - [`FunctionTable`] — Case-insensitive function signature lookup
//! - [`FunctionSignature`] — Accepted arity plus documentation for one function
//! - [`DiagnosticCollector`] — Builds diagnostics from offending symbols
//! - [`ValidationOptions`] — Validation tunables
//!
//! ## Flow
//!
//! ```text
//! SymbolTree + FunctionTable
//!     │
//!     ▼
//! validate(snapshot, tree, table, options)
//!     │
//!     ▼
//! Vec<Diagnostic>   (sorted: severity, line, column)
//! ```

mod diagnostics;
mod functions;
mod validate;

pub use diagnostics::DiagnosticCollector;
pub use functions::{FunctionCategory, FunctionSignature, FunctionTable, TableError};
pub use validate::{ValidationOptions, validate};
