//! The module contains the errors the ledger can throw.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Ledger custom errors.
///
/// The first four variants are caller faults and must never be retried with
/// the same input; [`Storage`] is an infrastructure fault a caller may retry.
///
/// [`Storage`]: LedgerError::Storage
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account \"{0}\" not found")]
    AccountNotFound(Uuid),
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("sender and receiver must be different accounts")]
    SelfTransferNotAllowed,
    #[error(transparent)]
    Storage(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (
                Self::InsufficientFunds {
                    available: a,
                    requested: ra,
                },
                Self::InsufficientFunds {
                    available: b,
                    requested: rb,
                },
            ) => a == b && ra == rb,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::SelfTransferNotAllowed, Self::SelfTransferNotAllowed) => true,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
