//! Read-side account queries.

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{Account, LedgerError, ResultLedger, Transaction, accounts, transactions};

use super::Ledger;

impl Ledger {
    /// Current balance snapshot for an account.
    pub async fn account(&self, account_id: Uuid) -> ResultLedger<Account> {
        let model = accounts::Entity::find_by_id(account_id.to_string())
            .one(&self.database)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        Account::try_from(model)
    }

    /// Lists the account's entries, newest first.
    pub async fn transactions_for_account(
        &self,
        account_id: Uuid,
        limit: u64,
    ) -> ResultLedger<Vec<Transaction>> {
        // Existence check first: an empty history and an unknown account are
        // different answers.
        self.account(account_id).await?;

        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(account_id.to_string()))
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}
