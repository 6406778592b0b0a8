//! Reconciliation engine.
//!
//! ## Module Structure
//!
//! - `data`: Catalog model and reconciliation result types
//! - `parsers`: JSON catalog loader
//! - `store`: Catalog persistence (`CatalogStore`, JSON writer)
//! - `coverage`: Per-locale missing/empty classification
//! - `reconcile`: Coverage x usage cross-reference (missing, untranslatable, unused)
//! - `routing`: Destination file resolution for new keys
//! - `preferences`: Auto-save preference store
//! - `usage`: Source usage analyzer and its cache
//! - `context`: Workspace wiring for CLI commands

pub mod context;
pub mod coverage;
pub mod data;
pub mod parsers;
pub mod preferences;
pub mod reconcile;
pub mod routing;
pub mod store;
pub mod usage;

pub use context::Workspace;
pub use data::*;
