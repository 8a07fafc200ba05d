//! Payments: the append-only audit trail of settlements.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub paid_by: String,
    pub paid_to: String,
    /// Magnitude only, never negative.
    pub amount_minor: i64,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    pub(crate) fn new(
        paid_by: String,
        paid_to: String,
        amount_minor: i64,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            paid_by,
            paid_to,
            amount_minor: amount_minor.abs(),
            paid_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub paid_by: String,
    pub paid_to: String,
    pub amount_minor: i64,
    pub paid_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            paid_by: ActiveValue::Set(payment.paid_by.clone()),
            paid_to: ActiveValue::Set(payment.paid_to.clone()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            paid_at: ActiveValue::Set(payment.paid_at),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "payment")?,
            paid_by: model.paid_by,
            paid_to: model.paid_to,
            amount_minor: model.amount_minor,
            paid_at: model.paid_at,
        })
    }
}
