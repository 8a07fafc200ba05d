//! Equal-share expense splitting.
//!
//! Every member, payer included, owes `floor(amount / members)` minor units.
//! The payer absorbs the rounding remainder, so the payer's implicit share is
//! `amount - sum(other shares)` and the shares always add back up to the
//! expense amount.
//!
//! ```rust
//! use engine::split_equally;
//!
//! let members = ["alice", "bob", "carol"].map(String::from);
//! let split = split_equally(100_00, "alice", &members).unwrap();
//!
//! assert!(split.shares.iter().all(|s| s.amount_minor == 33_33));
//! assert_eq!(split.payer_share_minor, 33_34);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// What one non-paying member owes the payer for an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub borrower: String,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub payer: String,
    pub payer_share_minor: i64,
    /// One entry per member other than the payer, in membership order.
    pub shares: Vec<Share>,
}

impl Split {
    /// Sum of every share, payer included. Always equals the split amount.
    #[must_use]
    pub fn total_minor(&self) -> i64 {
        self.payer_share_minor + self.shares.iter().map(|s| s.amount_minor).sum::<i64>()
    }
}

/// Splits `amount_minor` equally among `members`.
///
/// Fails with [`EngineError::InvalidExpense`] when the amount is not
/// positive, the member list is empty or the payer is not among the members.
/// Repeated usernames are counted once.
pub fn split_equally(amount_minor: i64, payer: &str, members: &[String]) -> ResultEngine<Split> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidExpense(
            "amount_minor must be > 0".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(members.len());
    let members: Vec<&str> = members
        .iter()
        .map(String::as_str)
        .filter(|member| seen.insert(*member))
        .collect();

    if members.is_empty() {
        return Err(EngineError::InvalidExpense(
            "group has no members".to_string(),
        ));
    }
    if !members.contains(&payer) {
        return Err(EngineError::InvalidExpense(format!(
            "payer {payer} is not a member of the group"
        )));
    }

    let count = members.len() as i64;
    let share_minor = amount_minor / count;

    let shares: Vec<Share> = members
        .into_iter()
        .filter(|member| *member != payer)
        .map(|borrower| Share {
            borrower: borrower.to_string(),
            amount_minor: share_minor,
        })
        .collect();

    let payer_share_minor = amount_minor - share_minor * shares.len() as i64;

    Ok(Split {
        payer: payer.to_string(),
        payer_share_minor,
        shares,
    })
}
