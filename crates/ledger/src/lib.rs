//! Wallet ledger engine.
//!
//! Users hold a balance and move money through top-ups, payments and peer
//! transfers. Every movement is recorded as an immutable [`Transaction`]
//! entry carrying the balance before and after, and the balance update
//! commits in the same database transaction as the entry itself.
//!
//! Concurrent operations on the same account are serialized by a per-account
//! guard, so two in-flight debits can never both spend the same funds.
//!
//! The engine is a stateless handle over a [`sea_orm::DatabaseConnection`];
//! construct one with [`Ledger::builder`].

pub use accounts::Account;
pub use commands::{CreditCmd, DebitCmd, TransferCmd};
pub use error::LedgerError;
pub use ops::{Ledger, LedgerBuilder};
pub use transactions::{Category, EntryKind, Transaction, TransactionStatus};

mod accounts;
mod commands;
mod error;
mod guard;
mod ops;
mod transactions;

type ResultLedger<T> = Result<T, LedgerError>;
