//! File parsers for catalog files.
//!
//! - `json`: JSON catalog parser (scans single-file and per-locale-directory layouts)

pub mod json;
