use chrono::Utc;
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Group, GroupSummary, ResultEngine, groups, ledger, memberships,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a group. The creator becomes its first member.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = normalize_required_text(name, "group name")?;
        let description = normalize_optional_text(description);

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let group = Group::new(name, description, user_id.to_string(), Utc::now());
            let group_model: groups::ActiveModel = (&group).into();
            group_model.insert(&db_tx).await?;

            memberships::ActiveModel {
                group_id: ActiveValue::Set(group.id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                joined_at: ActiveValue::Set(group.created_at),
                deleted_at: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;

            Ok(group)
        })
    }

    /// Return a group the user is an active member of.
    pub async fn group(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Group> {
        self.require_member(&self.database, group_id, user_id)
            .await
            .and_then(Group::try_from)
    }

    /// Every group the user actively belongs to, oldest first, with the
    /// user's lender-side total in each.
    pub async fn list_user_groups(&self, user_id: &str) -> ResultEngine<Vec<GroupSummary>> {
        let models = groups::Entity::find()
            .join(JoinType::InnerJoin, groups::Relation::Memberships.def())
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(memberships::Column::DeletedAt.is_null())
            .order_by_asc(groups::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut summaries = Vec::with_capacity(models.len());
        for model in models {
            let group = Group::try_from(model)?;
            let balance_minor = ledger::lender_total(&self.database, group.id, user_id).await?;
            summaries.push(GroupSummary {
                group,
                balance_minor,
            });
        }
        Ok(summaries)
    }

    /// Sum of every lender-side amount of `user_id` inside the group.
    pub async fn overall_group_balance(&self, group_id: Uuid, user_id: &str) -> ResultEngine<i64> {
        self.require_member(&self.database, group_id, user_id).await?;
        ledger::lender_total(&self.database, group_id, user_id).await
    }
}
