//! Core business logic - framework-agnostic ledger operations.
//!
//! Every multi-row financial write runs inside an explicit
//! begin/commit/rollback transaction opened here by the operation entry points.
//! Validation and not-found errors are detected before rows are written; once a
//! transaction is open, any error triggers a rollback whose own failure is
//! logged but never re-thrown over the original error.

/// Annual project ledger - derived assigned/used/available per (ceiling, year)
pub mod annual_project;
/// Budget ceiling store - the allocation envelope per (area, chapter, funding source)
pub mod ceiling;
/// Idempotent full recompute of used amounts from live requisitions
pub mod recalc;
/// Requisition engine - single, unified, and batch line-item flows
pub mod requisition;

use crate::errors::{Error, Result};
use sea_orm::DatabaseTransaction;
use tracing::error;

/// Commits `txn` when `result` is `Ok`, rolls it back otherwise.
///
/// A commit failure surfaces as [`Error::Transaction`]. A rollback failure is
/// logged and swallowed so the original error reaches the caller unmasked.
pub async fn commit_or_rollback<T>(txn: DatabaseTransaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => match txn.commit().await {
            Ok(()) => Ok(value),
            Err(err) => Err(Error::Transaction {
                message: format!("commit failed: {err}"),
            }),
        },
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!(%rollback_err, "rollback failed after ledger error");
            }
            Err(err)
        }
    }
}
