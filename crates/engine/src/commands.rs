//! Command structs for engine write operations.
//!
//! These types group the parameters of expense posting, settlement and
//! reminders, keeping call sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Post a shared expense paid by `paid_by` into a group.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub group_id: Uuid,
    pub paid_by: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Member logging the expense on the payer's behalf. Must be an active
    /// member of the group as well.
    pub recorded_by: Option<String>,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(
        group_id: Uuid,
        paid_by: impl Into<String>,
        amount_minor: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            group_id,
            paid_by: paid_by.into(),
            amount_minor,
            description: None,
            created_at,
            recorded_by: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn recorded_by(mut self, username: impl Into<String>) -> Self {
        self.recorded_by = Some(username.into());
        self
    }
}

/// Reset every balance between the acting user and a counterpart.
#[derive(Clone, Debug)]
pub struct SettleCmd {
    pub user_id: String,
    pub counterpart: String,
    /// Amount to record on the payment. When `None` the magnitude of the net
    /// balance between the two users is recorded.
    pub amount_minor: Option<i64>,
    pub paid_at: DateTime<Utc>,
}

impl SettleCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        counterpart: impl Into<String>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            counterpart: counterpart.into(),
            amount_minor: None,
            paid_at,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }
}

/// Ask a counterpart to settle up.
#[derive(Clone, Debug)]
pub struct ReminderCmd {
    pub user_id: String,
    pub counterpart: String,
    pub amount_minor: i64,
    pub sent_at: DateTime<Utc>,
}

impl ReminderCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        counterpart: impl Into<String>,
        amount_minor: i64,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            counterpart: counterpart.into(),
            amount_minor,
            sent_at,
        }
    }
}
