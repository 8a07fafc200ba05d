use api_types::reminder::{RemindNew, ReminderView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{User, commands::ReminderCmd};

use crate::{ServerError, server::ServerState};

pub async fn remind(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<RemindNew>,
) -> Result<(StatusCode, Json<ReminderView>), ServerError> {
    let reminder = state
        .engine
        .send_reminder(ReminderCmd::new(
            user.username,
            payload.counterpart,
            payload.amount_minor,
            Utc::now(),
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReminderView {
            id: reminder.id,
            sent_by: reminder.sent_by,
            sent_to: reminder.sent_to,
            amount_minor: reminder.amount_minor,
            sent_at: reminder.sent_at,
        }),
    ))
}
