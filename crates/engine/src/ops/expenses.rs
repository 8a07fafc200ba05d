use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Expense, LedgerEvent, ResultEngine,
    commands::ExpenseCmd,
    events::Recipient,
    expenses, ledger, split_equally, users,
    util::{normalize_optional_text, normalize_username},
};

use super::{Engine, with_tx};

impl Engine {
    /// Post an expense and split it equally among the active members.
    ///
    /// The payer may differ from the member recording the expense; both have
    /// to be active members of the group.
    ///
    /// The expense row and both directions of every share are written in one
    /// transaction. Validation and the split run before the first write; any
    /// store failure leaves no trace of the expense.
    pub async fn create_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let ExpenseCmd {
            group_id,
            paid_by,
            amount_minor,
            description,
            created_at,
            recorded_by,
        } = cmd;
        let expense = Expense::new(
            group_id,
            normalize_username(&paid_by)?,
            amount_minor,
            normalize_optional_text(description.as_deref()),
            created_at,
        )?;

        let (expense, event) = with_tx!(self, |db_tx| {
            if let Some(recorded_by) = &recorded_by {
                self.require_member(&db_tx, group_id, recorded_by).await?;
            }
            let group = self.require_member(&db_tx, group_id, &expense.paid_by).await?;
            let members = self.active_member_ids(&db_tx, group_id).await?;
            let split = split_equally(expense.amount_minor, &expense.paid_by, &members)?;

            let expense_model: expenses::ActiveModel = (&expense).into();
            expense_model.insert(&db_tx).await?;
            ledger::apply_split(&db_tx, group_id, &split).await?;

            let borrowers = split.shares.iter().map(|s| s.borrower.clone());
            let notify = users::Entity::find()
                .filter(users::Column::Username.is_in(borrowers))
                .order_by_asc(users::Column::Username)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|u| Recipient {
                    username: u.username,
                    email: u.email,
                })
                .collect();

            let event = LedgerEvent::ExpenseCreated {
                group_id,
                group_name: group.name,
                expense_id: expense.id,
                paid_by: expense.paid_by.clone(),
                amount_minor: expense.amount_minor,
                notify,
            };
            Ok((expense, event))
        })?;

        self.emit(event);
        Ok(expense)
    }

    /// Expenses of a group, newest first.
    pub async fn list_expenses(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Vec<Expense>> {
        self.require_member(&self.database, group_id, user_id).await?;

        expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}
