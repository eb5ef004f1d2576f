//! Read-only catalog endpoints: branches, settings, menu, tables.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;

use super::BranchQuery;
use crate::error::ApiResult;
use crate::AppState;
use luna_core::{BranchSummary, CoreError, Menu, RestaurantTable};

/// `GET /api/branches`
pub async fn list_branches(State(state): State<AppState>) -> ApiResult<Json<Vec<BranchSummary>>> {
    Ok(Json(state.db.catalog().list_branches().await?))
}

/// `GET /api/settings?branch_id=`
pub async fn settings(
    State(state): State<AppState>,
    query: Result<Query<BranchQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let branch_id = query.branch_id()?;

    let settings = state
        .db
        .catalog()
        .branch_settings(branch_id)
        .await?
        .ok_or(CoreError::BranchNotFound(branch_id))?;

    Ok(Json(settings.to_response()))
}

/// `GET /api/menu?branch_id=`
pub async fn menu(
    State(state): State<AppState>,
    query: Result<Query<BranchQuery>, QueryRejection>,
) -> ApiResult<Json<Menu>> {
    let Query(query) = query?;
    let branch_id = query.branch_id()?;

    Ok(Json(state.db.catalog().menu(branch_id).await?))
}

/// `GET /api/tables?branch_id=`
pub async fn tables(
    State(state): State<AppState>,
    query: Result<Query<BranchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RestaurantTable>>> {
    let Query(query) = query?;
    let branch_id = query.branch_id()?;

    Ok(Json(state.db.catalog().list_tables(branch_id).await?))
}
