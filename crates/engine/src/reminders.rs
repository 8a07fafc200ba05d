//! Reminders: a log of "please settle up" requests sent between users.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub sent_by: String,
    pub sent_to: String,
    pub amount_minor: i64,
    pub sent_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sent_by: String,
    pub sent_to: String,
    pub amount_minor: i64,
    pub sent_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reminder> for ActiveModel {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: ActiveValue::Set(reminder.id.to_string()),
            sent_by: ActiveValue::Set(reminder.sent_by.clone()),
            sent_to: ActiveValue::Set(reminder.sent_to.clone()),
            amount_minor: ActiveValue::Set(reminder.amount_minor),
            sent_at: ActiveValue::Set(reminder.sent_at),
        }
    }
}

impl TryFrom<Model> for Reminder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "reminder")?,
            sent_by: model.sent_by,
            sent_to: model.sent_to,
            amount_minor: model.amount_minor,
            sent_at: model.sent_at,
        })
    }
}
