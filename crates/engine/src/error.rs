//! The module contains the errors the engine can throw.
//!
//! The variants group into a few families:
//!
//! - validation: [`InvalidExpense`], [`InvalidAmount`], [`InvalidInput`],
//!   [`InvalidId`]; always raised before any write.
//! - lookup: [`KeyNotFound`], [`UserNotFound`].
//! - conflicts: [`ExistingKey`].
//! - guards: [`NonZeroBalance`] when a member with open debts is removed.
//! - access: [`Forbidden`] when the caller is not a member of the group.
//! - persistence: [`Database`], propagated unchanged from the store.
//!
//!  [`InvalidExpense`]: EngineError::InvalidExpense
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`UserNotFound`]: EngineError::UserNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`NonZeroBalance`]: EngineError::NonZeroBalance
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Non-zero balance: {0}")]
    NonZeroBalance(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidExpense(a), Self::InvalidExpense(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::NonZeroBalance(a), Self::NonZeroBalance(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
