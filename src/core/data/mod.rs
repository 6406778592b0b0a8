//! Core data types shared by the analysis, translation and cleanup paths.
//!
//! ## Module Structure
//!
//! - `message`: Catalog types (Catalog, LocaleMessages, LocaleRecord, MessageLocation)
//! - `sync`: Reconciliation results and write requests (CoverageReport, UsageReport,
//!   MissingKeyInfo, UnusedKeyInfo, PendingWrite, CatalogWrite)

pub mod message;
pub mod sync;

pub use message::{Catalog, LocaleMessages, LocaleRecord, MessageLocation, ValueType};
pub use sync::{
    CatalogWrite, CoverageReport, MissingKeyInfo, PendingWrite, UnusedKeyInfo, UsageReport,
};
