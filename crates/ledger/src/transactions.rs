//! Ledger entries.
//!
//! A [`Transaction`] is one immutable balance movement on a single account:
//! the direction ([`EntryKind`]), the magnitude, and a snapshot of the
//! balance immediately before and after. Entries are append-only; once their
//! creating database transaction commits they are never mutated or deleted.
//!
//! A peer transfer produces two entries, one `Debit` on the sender and one
//! `Credit` on the receiver, correlated by a shared `transfer_id` and
//! pointing at each other through `counterparty_id`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DbErr, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Direction of the balance movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Debit,
    Credit,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// Business purpose of an entry. Informational only, the engine applies the
/// same rules to every category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    TopUp,
    Payment,
    Transfer,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "TopUp",
            Self::Payment => "Payment",
            Self::Transfer => "Transfer",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "TopUp" => Ok(Self::TopUp),
            "Payment" => Ok(Self::Payment),
            "Transfer" => Ok(Self::Transfer),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

/// Lifecycle of an entry.
///
/// A row is inserted `Pending` and moved to `Completed` before its creating
/// database transaction commits; an aborted operation rolls its row back with
/// it, so `Failed` marks an entry whose unit was abandoned mid-flight and is
/// never reachable through the engine's own commit path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: EntryKind,
    pub category: Category,
    pub amount_minor: i64,
    pub remarks: Option<String>,
    pub status: TransactionStatus,
    pub balance_before: i64,
    pub balance_after: i64,
    /// The other account of a transfer, set on both legs.
    pub counterparty_id: Option<Uuid>,
    /// Shared identifier stamped on both legs of one transfer.
    pub transfer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a `Pending` entry, deriving `balance_after` from the direction.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        account_id: Uuid,
        kind: EntryKind,
        category: Category,
        amount_minor: i64,
        remarks: Option<String>,
        counterparty_id: Option<Uuid>,
        transfer_id: Option<Uuid>,
        balance_before: i64,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let balance_after = match kind {
            EntryKind::Debit => balance_before.checked_sub(amount_minor),
            EntryKind::Credit => balance_before.checked_add(amount_minor),
        }
        .ok_or_else(|| LedgerError::InvalidAmount("balance out of range".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            category,
            amount_minor,
            remarks,
            status: TransactionStatus::Pending,
            balance_before,
            balance_after,
            counterparty_id,
            transfer_id,
            created_at,
        })
    }

    /// Signed effect of this entry on its account's balance.
    pub fn signed_amount_minor(&self) -> i64 {
        match self.kind {
            EntryKind::Debit => -self.amount_minor,
            EntryKind::Credit => self.amount_minor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub category: String,
    pub amount_minor: i64,
    pub remarks: Option<String>,
    pub status: String,
    pub balance_before: i64,
    pub balance_after: i64,
    pub counterparty_user_id: Option<String>,
    pub transfer_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::UserId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.account_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            remarks: ActiveValue::Set(tx.remarks.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            balance_before: ActiveValue::Set(tx.balance_before),
            balance_after: ActiveValue::Set(tx.balance_after),
            counterparty_user_id: ActiveValue::Set(tx.counterparty_id.map(|id| id.to_string())),
            transfer_id: ActiveValue::Set(tx.transfer_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        // A row the engine wrote but can no longer decode is a storage
        // problem, not a caller fault.
        let corrupt =
            |what: &str| LedgerError::Storage(DbErr::Custom(format!("corrupt transaction {what}")));

        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| corrupt("id"))?,
            account_id: Uuid::parse_str(&model.user_id).map_err(|_| corrupt("user_id"))?,
            kind: EntryKind::try_from(model.kind.as_str()).map_err(|_| corrupt("kind"))?,
            category: Category::try_from(model.category.as_str())
                .map_err(|_| corrupt("category"))?,
            amount_minor: model.amount_minor,
            remarks: model.remarks,
            status: TransactionStatus::try_from(model.status.as_str())
                .map_err(|_| corrupt("status"))?,
            balance_before: model.balance_before,
            balance_after: model.balance_after,
            counterparty_id: match model.counterparty_user_id {
                Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| corrupt("counterparty"))?),
                None => None,
            },
            transfer_id: match model.transfer_id {
                Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| corrupt("transfer_id"))?),
                None => None,
            },
            created_at: model.created_at,
        })
    }
}
