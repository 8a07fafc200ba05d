use std::collections::HashMap;

use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{Balance, BalanceKey, BalanceOverview, BorrowerBalance, ResultEngine, ledger, users};

use super::Engine;

impl Engine {
    /// What every borrower owes `user_id`, summed across all groups or, with
    /// `group_id`, inside one group only.
    ///
    /// Positive amounts are owed to the user; negative ones are owed by them.
    pub async fn balances(
        &self,
        user_id: &str,
        group_id: Option<Uuid>,
    ) -> ResultEngine<BalanceOverview> {
        let db = &self.database;
        match group_id {
            Some(group_id) => {
                self.require_member(db, group_id, user_id).await?;
            }
            None => {
                self.require_user(db, user_id).await?;
            }
        }

        let sums = ledger::sum_by_borrower(db, group_id, user_id).await?;
        let emails: HashMap<String, String> = users::Entity::find()
            .filter(users::Column::Username.is_in(sums.iter().map(|(b, _)| b.clone())))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.username, u.email))
            .collect();

        let balances: Vec<BorrowerBalance> = sums
            .into_iter()
            .map(|(borrower, amount_minor)| BorrowerBalance {
                email: emails.get(&borrower).cloned(),
                borrower,
                amount_minor,
            })
            .collect();

        Ok(BalanceOverview {
            username: user_id.to_string(),
            total_minor: balances.iter().map(|b| b.amount_minor).sum(),
            balances,
        })
    }

    /// A single ledger row as stored. Absent rows read as zero.
    pub async fn balance(&self, key: &BalanceKey) -> ResultEngine<Balance> {
        let amount_minor = ledger::amount(&self.database, key).await?;
        Ok(Balance {
            key: key.clone(),
            amount_minor,
        })
    }
}
