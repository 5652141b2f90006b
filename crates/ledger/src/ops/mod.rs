use sea_orm::DatabaseConnection;

use crate::{LedgerError, ResultLedger, guard::AccountLocks};

mod entries;
mod queries;
mod transfers;

/// Run a block inside a DB transaction, committing on success and rolling back
/// (via drop) on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine: a stateless handle over the store.
///
/// Cheap to share behind an `Arc`; all mutating operations serialize per
/// account through the internal guard, never through `&mut self`.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
    locks: AccountLocks,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }
}

fn validate_amount(amount_minor: i64) -> ResultLedger<()> {
    if amount_minor <= 0 {
        return Err(LedgerError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            database: self.database,
            locks: AccountLocks::default(),
        })
    }
}
