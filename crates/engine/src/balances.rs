//! Ledger rows.
//!
//! A row `(group_id, lender, borrower) -> amount_minor` is the signed amount
//! the borrower owes the lender within one group. Rows always exist in pairs:
//! `(G, A, B, x)` next to `(G, B, A, -x)`. Absent rows read as zero; settled
//! rows are kept with amount `0` rather than deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// Composite key of a ledger row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    pub group_id: Uuid,
    pub lender: String,
    pub borrower: String,
}

impl BalanceKey {
    pub fn new(group_id: Uuid, lender: impl Into<String>, borrower: impl Into<String>) -> Self {
        Self {
            group_id,
            lender: lender.into(),
            borrower: borrower.into(),
        }
    }

    /// The key of the mirrored row (lender and borrower swapped).
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            group_id: self.group_id,
            lender: self.borrower.clone(),
            borrower: self.lender.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub key: BalanceKey,
    pub amount_minor: i64,
}

/// Lender-side total toward one borrower, summed over the rows in scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerBalance {
    pub borrower: String,
    pub email: Option<String>,
    pub amount_minor: i64,
}

/// Everything a user is owed (positive) or owes (negative), per borrower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOverview {
    pub username: String,
    pub total_minor: i64,
    pub balances: Vec<BorrowerBalance>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub lender: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub borrower: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Balance {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            key: BalanceKey {
                group_id: parse_uuid(&model.group_id, "group")?,
                lender: model.lender,
                borrower: model.borrower,
            },
            amount_minor: model.amount_minor,
        })
    }
}
