use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Member, ResultEngine, ledger, memberships, users, util::normalize_username,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add `member` to the group on behalf of `user_id`.
    ///
    /// A previously removed member is revived; an active one is a conflict.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        member: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        let member = normalize_username(member)?;

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            self.require_user(&db_tx, &member).await?;

            match self.membership(&db_tx, group_id, &member).await? {
                Some(existing) if existing.is_active() => {
                    return Err(EngineError::ExistingKey(member));
                }
                Some(existing) => {
                    let mut active: memberships::ActiveModel = existing.into();
                    active.joined_at = ActiveValue::Set(Utc::now());
                    active.deleted_at = ActiveValue::Set(None);
                    active.update(&db_tx).await?;
                }
                None => {
                    memberships::ActiveModel {
                        group_id: ActiveValue::Set(group_id.to_string()),
                        user_id: ActiveValue::Set(member),
                        joined_at: ActiveValue::Set(Utc::now()),
                        deleted_at: ActiveValue::Set(None),
                    }
                    .insert(&db_tx)
                    .await?;
                }
            }
            Ok(())
        })
    }

    /// Active members of the group, each with what they owe `user_id` there.
    pub async fn list_members(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Vec<Member>> {
        let db = &self.database;
        self.require_member(db, group_id, user_id).await?;

        let member_ids = self.active_member_ids(db, group_id).await?;
        let amounts = ledger::amounts_toward(db, group_id, user_id, &member_ids).await?;
        let emails = users::Entity::find()
            .filter(users::Column::Username.is_in(member_ids.iter().cloned()))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.username, u.email))
            .collect::<HashMap<_, _>>();

        Ok(member_ids
            .into_iter()
            .map(|username| Member {
                email: emails.get(&username).cloned().unwrap_or_default(),
                balance_minor: amounts.get(&username).copied().unwrap_or(0),
                username,
            })
            .collect())
    }

    /// Remove `member` from the group.
    ///
    /// Refused with `NonZeroBalance` while any row where `member` is the
    /// borrower in this group holds a non-zero amount. Removal only marks the
    /// membership as deleted.
    pub async fn remove_member(
        &self,
        group_id: Uuid,
        member: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        let member = normalize_username(member)?;

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;

            let existing = self
                .membership(&db_tx, group_id, &member)
                .await?
                .filter(memberships::Model::is_active)
                .ok_or_else(|| EngineError::KeyNotFound("member not exists".to_string()))?;

            let open = ledger::rows_for_borrower(&db_tx, group_id, &member)
                .await?
                .into_iter()
                .filter(|row| row.amount_minor != 0)
                .count();
            if open > 0 {
                return Err(EngineError::NonZeroBalance(format!(
                    "{member} has {open} open balance(s) in the group"
                )));
            }

            let mut active: memberships::ActiveModel = existing.into();
            active.deleted_at = ActiveValue::Set(Some(Utc::now()));
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
