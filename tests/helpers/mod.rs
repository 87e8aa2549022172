//! Shared test helpers for the integration suite.

pub mod diagnostic_helpers;
pub mod source_fixtures;
pub mod symbol_assertions;
