//! Unified error types for the ledger core.
//!
//! Validation and not-found errors are raised before any transaction is opened.
//! Once a transaction is open, any error triggers a rollback; rollback failures
//! are logged separately so the original error always reaches the caller.

use thiserror::Error;

/// Crate-wide error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, detected before any write is attempted.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable explanation of what failed validation
        message: String,
    },

    /// A referenced entity (ceiling, product, requisition, ...) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"budget ceiling"`
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// The operation would orphan or destroy financial history.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable explanation of the conflict
        message: String,
    },

    /// The folio generator exhausted its collision-retry budget for one item.
    #[error("Folio generation exhausted retries for prefix {prefix}, year {year}")]
    ConcurrencyExhausted {
        /// Folio prefix being issued
        prefix: String,
        /// Fiscal year being issued
        year: i32,
    },

    /// Commit or rollback of a database transaction itself failed.
    #[error("Transaction error: {message}")]
    Transaction {
        /// What the transaction machinery reported
        message: String,
    },

    /// Underlying database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport or decoding failure talking to the external area catalog.
    #[error("Catalog error: {0}")]
    Catalog(#[from] reqwest::Error),

    /// Configuration error (settings file, environment).
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable explanation
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] with a displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
