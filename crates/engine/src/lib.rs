//! Ledger engine of the expense-splitting service.
//!
//! Users form groups and post shared expenses; every expense is split equally
//! among the active members and recorded as a pair of mirrored ledger rows
//! per borrower. Settling up resets every row between two users and logs a
//! payment. All amounts are integer minor units.

pub use balances::{Balance, BalanceKey, BalanceOverview, BorrowerBalance};
pub use error::EngineError;
pub use events::{LedgerEvent, Recipient};
pub use expenses::Expense;
pub use groups::{Group, GroupSummary};
pub use memberships::Member;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use payments::Payment;
pub use reminders::Reminder;
pub use split::{Share, Split, split_equally};
pub use users::User;

pub mod commands;
pub mod events;

mod balances;
mod error;
mod expenses;
mod groups;
mod ledger;
mod memberships;
mod money;
mod ops;
mod payments;
mod reminders;
mod split;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
