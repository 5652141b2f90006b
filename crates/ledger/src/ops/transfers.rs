//! Peer transfers: two opposite entries committed as one unit.

use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{Category, EntryKind, LedgerError, ResultLedger, Transaction, TransferCmd};

use super::{Ledger, validate_amount, with_tx};

impl Ledger {
    /// Moves funds from `sender_id` to `receiver_id`.
    ///
    /// Either both legs land or neither does: the sender's `Debit` and the
    /// receiver's `Credit` share one database transaction, one freshly minted
    /// `transfer_id`, and cross-referencing counterparties. The debit runs
    /// first, so an insufficient sender balance aborts before the credit is
    /// even attempted, and any later failure (receiver missing, store error)
    /// rolls the debit back too.
    ///
    /// Returns `(sender_entry, receiver_entry)`.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultLedger<(Transaction, Transaction)> {
        if cmd.sender_id == cmd.receiver_id {
            return Err(LedgerError::SelfTransferNotAllowed);
        }
        validate_amount(cmd.amount_minor)?;

        // Both guards are held across the whole unit; the fixed acquisition
        // order inside `acquire_pair` keeps opposite transfers on the same
        // pair of accounts from deadlocking.
        let _guards = self.locks.acquire_pair(cmd.sender_id, cmd.receiver_id).await;

        let transfer_id = Uuid::new_v4();
        let (sender_entry, receiver_entry) = with_tx!(self, |db_tx| {
            let debit = self
                .record_entry(
                    &db_tx,
                    cmd.sender_id,
                    EntryKind::Debit,
                    Category::Transfer,
                    cmd.amount_minor,
                    cmd.remarks.clone(),
                    Some(cmd.receiver_id),
                    Some(transfer_id),
                )
                .await?;
            let credit = self
                .record_entry(
                    &db_tx,
                    cmd.receiver_id,
                    EntryKind::Credit,
                    Category::Transfer,
                    cmd.amount_minor,
                    cmd.remarks.clone(),
                    Some(cmd.sender_id),
                    Some(transfer_id),
                )
                .await?;
            Ok::<_, LedgerError>((debit, credit))
        })?;

        tracing::debug!(
            %transfer_id,
            sender_id = %cmd.sender_id,
            receiver_id = %cmd.receiver_id,
            amount_minor = cmd.amount_minor,
            "transfer committed"
        );
        Ok((sender_entry, receiver_entry))
    }
}
