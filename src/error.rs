//! Error taxonomy for ledger operations.
//!
//! Every failure the ledger core can report is one of four kinds. Outer layers
//! (statement files, exporters, the command front end) wrap these in
//! `anyhow::Error` with extra context.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum LedgerError {
    /// A required field was empty or missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced client, account or transaction does not exist.
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// An import record could not be normalized. `position` is zero-based
    /// within the submitted batch.
    #[error("Malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// Import was called with no records.
    #[error("Import batch is empty")]
    EmptyBatch,
}

impl LedgerError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn client_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Client",
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn account_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn transaction_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub(crate) type LedgerResult<T> = Result<T, LedgerError>;
