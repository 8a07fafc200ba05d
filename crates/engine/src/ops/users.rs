use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, users,
    util::{normalize_email, normalize_username},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a new user.
    ///
    /// Username and email must both be unused; the email is stored lowercase.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<User> {
        let username = normalize_username(username)?;
        let email = normalize_email(email)?;
        if password.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }
            if users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(email));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password.to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Ok(User::from(model))
        })
    }

    /// Return the user matching both `username` and `password`, if any.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Password.eq(password))
            .one(&self.database)
            .await?;
        Ok(user.map(User::from))
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        self.require_user(&self.database, username)
            .await
            .map(User::from)
    }

    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or(EngineError::UserNotFound(email))
    }
}
