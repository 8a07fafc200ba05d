//! User endpoints: registration and lookups.

use api_types::user::{Register, UserLookup, UserView};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::User;

use crate::{ServerError, server::ServerState};

pub(crate) fn view(user: User) -> UserView {
    UserView {
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register_user(&payload.username, &payload.email, &payload.password)
        .await?;
    tracing::info!("registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(view(user))))
}

pub async fn details(Extension(user): Extension<User>) -> Json<UserView> {
    Json(view(user))
}

pub async fn lookup(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<UserLookup>,
) -> Result<Json<UserView>, ServerError> {
    if query.email.trim().is_empty() {
        return Err(ServerError::Generic(
            "missing `email` query parameter".to_string(),
        ));
    }
    let user = state.engine.user_by_email(&query.email).await?;
    Ok(Json(view(user)))
}
