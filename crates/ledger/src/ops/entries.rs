//! Single-entry credit and debit operations.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CreditCmd, DebitCmd, EntryKind, LedgerError, ResultLedger, Transaction,
    TransactionStatus, accounts, transactions,
};

use super::{Ledger, validate_amount, with_tx};

impl Ledger {
    /// Adds funds to an account and records the matching `Credit` entry.
    ///
    /// Crediting never fails for insufficiency; the only caller faults are a
    /// non-positive amount and an unknown account.
    pub async fn credit(&self, cmd: CreditCmd) -> ResultLedger<Transaction> {
        validate_amount(cmd.amount_minor)?;

        let _guard = self.locks.acquire(cmd.account_id).await;
        let entry = with_tx!(self, |db_tx| {
            self.record_entry(
                &db_tx,
                cmd.account_id,
                EntryKind::Credit,
                cmd.category,
                cmd.amount_minor,
                cmd.remarks,
                cmd.counterparty_id,
                None,
            )
            .await
        })?;

        tracing::debug!(
            account_id = %entry.account_id,
            amount_minor = entry.amount_minor,
            balance_after = entry.balance_after,
            "credit committed"
        );
        Ok(entry)
    }

    /// Removes funds from an account and records the matching `Debit` entry.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] when the balance cannot
    /// cover the amount; nothing is written in that case.
    pub async fn debit(&self, cmd: DebitCmd) -> ResultLedger<Transaction> {
        validate_amount(cmd.amount_minor)?;

        let _guard = self.locks.acquire(cmd.account_id).await;
        let entry = with_tx!(self, |db_tx| {
            self.record_entry(
                &db_tx,
                cmd.account_id,
                EntryKind::Debit,
                cmd.category,
                cmd.amount_minor,
                cmd.remarks,
                cmd.counterparty_id,
                None,
            )
            .await
        })?;

        tracing::debug!(
            account_id = %entry.account_id,
            amount_minor = entry.amount_minor,
            balance_after = entry.balance_after,
            "debit committed"
        );
        Ok(entry)
    }

    /// Performs one read-validate-write sequence against `account_id`.
    ///
    /// Callers must already hold the account's guard and an open transaction:
    /// the entry row and the balance update land in `db_tx` together, so they
    /// commit or roll back as one unit. The row is inserted `Pending` and
    /// moved to `Completed` before the unit ends, never after.
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn record_entry(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        kind: EntryKind,
        category: Category,
        amount_minor: i64,
        remarks: Option<String>,
        counterparty_id: Option<Uuid>,
        transfer_id: Option<Uuid>,
    ) -> ResultLedger<Transaction> {
        let account = accounts::Entity::find_by_id(account_id.to_string())
            .one(db_tx)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        if kind == EntryKind::Debit && account.balance < amount_minor {
            tracing::warn!(
                %account_id,
                available = account.balance,
                requested = amount_minor,
                "debit rejected"
            );
            return Err(LedgerError::InsufficientFunds {
                available: account.balance,
                requested: amount_minor,
            });
        }

        let mut entry = Transaction::new(
            account_id,
            kind,
            category,
            amount_minor,
            remarks,
            counterparty_id,
            transfer_id,
            account.balance,
            Utc::now(),
        )?;

        transactions::ActiveModel::from(&entry).insert(db_tx).await?;

        entry.status = TransactionStatus::Completed;
        let completed = transactions::ActiveModel {
            id: ActiveValue::Set(entry.id.to_string()),
            status: ActiveValue::Set(entry.status.as_str().to_string()),
            ..Default::default()
        };
        completed.update(db_tx).await?;

        let account_update = accounts::ActiveModel {
            id: ActiveValue::Set(account_id.to_string()),
            balance: ActiveValue::Set(entry.balance_after),
        };
        account_update.update(db_tx).await?;

        Ok(entry)
    }
}
