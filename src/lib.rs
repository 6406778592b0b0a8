//! Keysync - translation catalog reconciliation and auto-fill
//!
//! Keysync reconciles a hierarchical key/value translation catalog spread across
//! multiple locale files against the keys a source codebase actually references.
//! It reports missing, empty and unused keys, and drives a rate-limited,
//! cancellable pipeline that fills missing translations through an external backend.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands, prompts, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Catalog model, coverage, reconciliation, routing, preferences, usage
//! - `translate`: Translation backend contract and the orchestrator state machine
//! - `cleanup`: Batch removal of unused keys
//! - `issues`: Issue type definitions for check reports
//! - `surface`: Confirmation prompts the core asks through
//! - `error`: Typed error kinds
//! - `utils`: Shared utility functions

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod issues;
pub mod surface;
pub mod translate;
pub mod utils;
