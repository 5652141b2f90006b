//! Per-account serialization of balance mutations.
//!
//! Every credit, debit and transfer leg runs a read-validate-write sequence
//! against an account's balance. Without exclusion, two concurrent operations
//! can read the same `balance_before` and overwrite each other's update (the
//! classic lost update). The guard keys one async mutex per account and is
//! held for the whole sequence, including the database commit.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-account locks, populated lazily.
///
/// Entries are one `Arc<Mutex<()>>` per account ever touched and are never
/// evicted; the map only grows with the set of active accounts.
#[derive(Debug, Default)]
pub(crate) struct AccountLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    async fn handle(&self, account_id: Uuid) -> Arc<Mutex<()>> {
        let mut registry = self.inner.lock().await;
        registry.entry(account_id).or_default().clone()
    }

    /// Locks one account for the duration of a read-validate-write sequence.
    ///
    /// The guard releases on drop on every exit path, success or error.
    pub(crate) async fn acquire(&self, account_id: Uuid) -> OwnedMutexGuard<()> {
        self.handle(account_id).await.lock_owned().await
    }

    /// Locks two accounts, always smaller id first.
    ///
    /// The fixed order keeps opposite transfers on the same pair of accounts
    /// from deadlocking. Callers must pass two distinct ids.
    pub(crate) async fn acquire_pair(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        debug_assert_ne!(a, b);
        if a < b {
            (self.acquire(a).await, self.acquire(b).await)
        } else {
            let second = self.acquire(b).await;
            let first = self.acquire(a).await;
            (first, second)
        }
    }
}
