//! Domain events emitted after a ledger change commits.
//!
//! Events travel over an unbounded channel handed to the engine builder and
//! are consumed by a separate worker (email notifications). Emission happens
//! strictly after commit and never fails the operation: if nobody listens the
//! event is dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

pub type EventSender = mpsc::UnboundedSender<LedgerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<LedgerEvent>;

/// Creates the channel to wire an [`Engine`](crate::Engine) to a worker.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A user to notify, with the address resolved inside the transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    ExpenseCreated {
        group_id: Uuid,
        group_name: String,
        expense_id: Uuid,
        paid_by: String,
        amount_minor: i64,
        /// Every member that now owes the payer a share.
        notify: Vec<Recipient>,
    },
    Settled {
        payment_id: Uuid,
        paid_by: String,
        paid_to: Recipient,
        amount_minor: i64,
    },
    ReminderSent {
        reminder_id: Uuid,
        sent_by: String,
        sent_to: Recipient,
        amount_minor: i64,
    },
}
