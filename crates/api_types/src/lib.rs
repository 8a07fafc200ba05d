use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    /// Query string of `GET /user`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserLookup {
        #[serde(default)]
        pub email: String,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
        /// Caller's lender-side total in the group. Absent when the group was
        /// just created.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub email: String,
        /// What this member owes the caller in the group.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub group_id: Uuid,
        /// Member who paid. Defaults to the caller.
        pub paid_by: Option<String>,
        /// Must be > 0.
        pub amount_minor: i64,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset. Defaults to now.
        pub created_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub group_id: Uuid,
        pub paid_by: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BorrowerBalance {
        pub borrower: String,
        pub email: Option<String>,
        /// Positive: the borrower owes the caller. Negative: the caller owes.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub username: String,
        pub total_minor: i64,
        pub balances: Vec<BorrowerBalance>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupBalance {
        pub group_id: Uuid,
        pub balance_minor: i64,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Settle {
        pub counterpart: String,
        /// Recorded on the payment. Defaults to the net balance between the
        /// two users.
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub paid_by: String,
        pub paid_to: String,
        pub amount_minor: i64,
        pub paid_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentsResponse {
        pub payments: Vec<PaymentView>,
    }
}

pub mod reminder {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RemindNew {
        pub counterpart: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderView {
        pub id: Uuid,
        pub sent_by: String,
        pub sent_to: String,
        pub amount_minor: i64,
        pub sent_at: DateTime<Utc>,
    }
}
