//! Group and membership endpoints.

use api_types::group::{
    GroupNew, GroupView, GroupsResponse, MemberAdd, MemberView, MembersResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Group, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(group: Group, balance_minor: Option<i64>) -> GroupView {
    GroupView {
        id: group.id,
        name: group.name,
        description: group.description,
        created_by: group.created_by,
        created_at: group.created_at,
        balance_minor,
    }
}

pub async fn group_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .create_group(&payload.name, payload.description.as_deref(), &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(view(group, None))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .list_user_groups(&user.username)
        .await?
        .into_iter()
        .map(|summary| view(summary.group, Some(summary.balance_minor)))
        .collect();

    Ok(Json(GroupsResponse { groups }))
}

pub async fn list_members(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .list_members(group_id, &user.username)
        .await?
        .into_iter()
        .map(|member| MemberView {
            username: member.username,
            email: member.email,
            balance_minor: member.balance_minor,
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn add_member(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MemberAdd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .add_member(group_id, &payload.username, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_member(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((group_id, username)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_member(group_id, &username, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
