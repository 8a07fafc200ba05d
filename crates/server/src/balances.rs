use api_types::balance::{BalancesResponse, BorrowerBalance, GroupBalance};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{BalanceOverview, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(overview: BalanceOverview) -> BalancesResponse {
    BalancesResponse {
        username: overview.username,
        total_minor: overview.total_minor,
        balances: overview
            .balances
            .into_iter()
            .map(|b| BorrowerBalance {
                borrower: b.borrower,
                email: b.email,
                amount_minor: b.amount_minor,
            })
            .collect(),
    }
}

/// Balances toward every borrower, across all groups.
pub async fn overall(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let overview = state.engine.balances(&user.username, None).await?;
    Ok(Json(view(overview)))
}

pub async fn group(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let overview = state.engine.balances(&user.username, Some(group_id)).await?;
    Ok(Json(view(overview)))
}

pub async fn group_total(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupBalance>, ServerError> {
    let balance_minor = state
        .engine
        .overall_group_balance(group_id, &user.username)
        .await?;
    Ok(Json(GroupBalance {
        group_id,
        balance_minor,
    }))
}
