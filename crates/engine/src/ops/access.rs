use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, groups, memberships, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(username.to_string()))
    }

    pub(super) async fn require_group<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    pub(super) async fn membership<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: Uuid,
        username: &str,
    ) -> ResultEngine<Option<memberships::Model>> {
        memberships::Entity::find_by_id((group_id.to_string(), username.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Resolves the group and checks that `username` is an active member.
    ///
    /// Missing group is `KeyNotFound`; a non-member (or a removed one) is
    /// `Forbidden`.
    pub(super) async fn require_member<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: Uuid,
        username: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_group(db, group_id).await?;
        let active = self
            .membership(db, group_id, username)
            .await?
            .is_some_and(|m| m.is_active());
        if !active {
            return Err(EngineError::Forbidden(format!(
                "{username} is not a member of the group"
            )));
        }
        Ok(group)
    }

    /// Usernames of the active members, ordered by username.
    pub(super) async fn active_member_ids<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: Uuid,
    ) -> ResultEngine<Vec<String>> {
        Ok(memberships::Entity::find()
            .filter(memberships::Column::GroupId.eq(group_id.to_string()))
            .filter(memberships::Column::DeletedAt.is_null())
            .order_by_asc(memberships::Column::UserId)
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect())
    }
}
