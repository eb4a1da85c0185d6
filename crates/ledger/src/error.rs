//! The module contains the error the ledger can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a group, member, or expense is not found.
//! - [`Storage`] thrown when the snapshot store fails.
//!
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
//!  [`Storage`]: LedgerError::Storage
use thiserror::Error;

use crate::storage::StorageError;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidSplit(a), Self::InvalidSplit(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
