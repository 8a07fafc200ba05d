use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{Payment, ResultEngine, payments};

use super::Engine;

impl Engine {
    /// Payments the user made or received, newest first.
    pub async fn list_payments(&self, user_id: &str) -> ResultEngine<Vec<Payment>> {
        self.require_user(&self.database, user_id).await?;

        payments::Entity::find()
            .filter(
                Condition::any()
                    .add(payments::Column::PaidBy.eq(user_id))
                    .add(payments::Column::PaidTo.eq(user_id)),
            )
            .order_by_desc(payments::Column::PaidAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect()
    }
}
