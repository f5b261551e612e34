//! `ceiling-ledger` - The budget-ceiling / requisition ledger core.
//!
//! This crate keeps the three derived monetary fields of an annual project
//! (assigned, used, available) consistent for every (budget ceiling × fiscal year)
//! pair while requisitions are created, updated, and deleted. All money flows
//! through exact decimal arithmetic, multi-row writes run inside explicit
//! transactions, and human-readable folios come from a mutex-guarded sequential
//! generator shared by every folio-bearing table.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// External area/infrastructure catalog client (name resolution only)
pub mod catalog;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - ceilings, annual projects, recalculation, requisitions
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Sequential folio generation with a mutex-guarded counter cache
pub mod folio;
/// Exact decimal money arithmetic used by every other module
pub mod money;

#[cfg(test)]
pub mod test_utils;
