use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LedgerEvent, Reminder, ResultEngine, commands::ReminderCmd, events::Recipient,
    reminders,
};

use super::{Engine, with_tx};

impl Engine {
    /// Log a request to settle up and notify the counterpart.
    pub async fn send_reminder(&self, cmd: ReminderCmd) -> ResultEngine<Reminder> {
        let ReminderCmd {
            user_id,
            counterpart,
            amount_minor,
            sent_at,
        } = cmd;
        if user_id == counterpart {
            return Err(EngineError::InvalidInput(
                "cannot remind yourself".to_string(),
            ));
        }
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let (reminder, event) = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &user_id).await?;
            let counterpart = self.require_user(&db_tx, &counterpart).await?;

            let reminder = Reminder {
                id: Uuid::new_v4(),
                sent_by: user_id.clone(),
                sent_to: counterpart.username.clone(),
                amount_minor,
                sent_at,
            };
            let reminder_model: reminders::ActiveModel = (&reminder).into();
            reminder_model.insert(&db_tx).await?;

            let event = LedgerEvent::ReminderSent {
                reminder_id: reminder.id,
                sent_by: reminder.sent_by.clone(),
                sent_to: Recipient {
                    username: counterpart.username,
                    email: counterpart.email,
                },
                amount_minor,
            };
            Ok((reminder, event))
        })?;

        self.emit(event);
        Ok(reminder)
    }
}
