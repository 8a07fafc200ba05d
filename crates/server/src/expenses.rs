//! Expense endpoints. The payer defaults to the authenticated user.

use api_types::expense::{ExpenseNew, ExpenseView, ExpensesResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Expense, User, commands::ExpenseCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        group_id: expense.group_id,
        paid_by: expense.paid_by,
        amount_minor: expense.amount_minor,
        description: expense.description,
        created_at: expense.created_at,
    }
}

pub async fn expense_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let created_at = payload
        .created_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));
    let paid_by = payload
        .paid_by
        .unwrap_or_else(|| user.username.clone());
    let mut cmd = ExpenseCmd::new(payload.group_id, paid_by, payload.amount_minor, created_at)
        .recorded_by(user.username);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let expense = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(expense))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(group_id, &user.username)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(ExpensesResponse { expenses }))
}
