use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    EngineError, LedgerEvent, Payment, ResultEngine, commands::SettleCmd, events::Recipient,
    ledger, payments,
};

use super::{Engine, with_tx};

impl Engine {
    /// Settle up between the acting user and a counterpart.
    ///
    /// Every ledger row between the two, in both directions and in every
    /// group, is reset to zero and one payment from the actor to the
    /// counterpart is recorded. Without an explicit amount the payment
    /// carries the magnitude of their net cross-group balance.
    pub async fn settle(&self, cmd: SettleCmd) -> ResultEngine<Payment> {
        let SettleCmd {
            user_id,
            counterpart,
            amount_minor,
            paid_at,
        } = cmd;
        if user_id == counterpart {
            return Err(EngineError::InvalidInput(
                "cannot settle with yourself".to_string(),
            ));
        }

        let (payment, event) = with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &user_id).await?;
            let counterpart = self.require_user(&db_tx, &counterpart).await?;

            let amount_minor = match amount_minor {
                Some(amount) => amount,
                None => ledger::net_between(&db_tx, &user_id, &counterpart.username).await?,
            };
            ledger::reset_pair(&db_tx, &user_id, &counterpart.username).await?;

            let payment = Payment::new(
                user_id.clone(),
                counterpart.username.clone(),
                amount_minor,
                paid_at,
            );
            let payment_model: payments::ActiveModel = (&payment).into();
            payment_model.insert(&db_tx).await?;

            let event = LedgerEvent::Settled {
                payment_id: payment.id,
                paid_by: payment.paid_by.clone(),
                paid_to: Recipient {
                    username: counterpart.username,
                    email: counterpart.email,
                },
                amount_minor: payment.amount_minor,
            };
            Ok((payment, event))
        })?;

        self.emit(event);
        Ok(payment)
    }
}
