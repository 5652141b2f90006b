//! Command structs for ledger operations.
//!
//! These types group the already-validated parameters of a write operation,
//! keeping call sites readable and avoiding long argument lists. The
//! embedding layer is expected to have authenticated the actor and parsed the
//! raw request before building one of these.

use uuid::Uuid;

use crate::Category;

/// Add funds to an account.
#[derive(Clone, Debug)]
pub struct CreditCmd {
    pub account_id: Uuid,
    pub amount_minor: i64,
    pub category: Category,
    pub remarks: Option<String>,
    pub counterparty_id: Option<Uuid>,
}

impl CreditCmd {
    #[must_use]
    pub fn new(account_id: Uuid, amount_minor: i64, category: Category) -> Self {
        Self {
            account_id,
            amount_minor,
            category,
            remarks: None,
            counterparty_id: None,
        }
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn counterparty(mut self, counterparty_id: Uuid) -> Self {
        self.counterparty_id = Some(counterparty_id);
        self
    }
}

/// Remove funds from an account.
#[derive(Clone, Debug)]
pub struct DebitCmd {
    pub account_id: Uuid,
    pub amount_minor: i64,
    pub category: Category,
    pub remarks: Option<String>,
    pub counterparty_id: Option<Uuid>,
}

impl DebitCmd {
    #[must_use]
    pub fn new(account_id: Uuid, amount_minor: i64, category: Category) -> Self {
        Self {
            account_id,
            amount_minor,
            category,
            remarks: None,
            counterparty_id: None,
        }
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    #[must_use]
    pub fn counterparty(mut self, counterparty_id: Uuid) -> Self {
        self.counterparty_id = Some(counterparty_id);
        self
    }
}

/// Move funds from a sender to a receiver as one indivisible unit.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub amount_minor: i64,
    pub remarks: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(sender_id: Uuid, receiver_id: Uuid, amount_minor: i64) -> Self {
        Self {
            sender_id,
            receiver_id,
            amount_minor,
            remarks: None,
        }
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
