//! Group management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use divvy_shared::types::GroupId;
use divvy_store::{GroupRecord, GroupSummary, UpdateGroupInput};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the group routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group).get(list_groups))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}", put(update_group))
        .route("/groups/{group_id}", delete(delete_group))
        .route("/groups/{group_id}/summary", get(group_summary))
}

/// Request body for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// Request body for updating a group.
#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    /// New name, if changed.
    pub name: Option<String>,
    /// New description, if changed.
    pub description: Option<String>,
}

/// Response wrapping a single group.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The group record.
    pub group: GroupRecord,
}

/// Response wrapping a list of groups.
#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// All groups.
    pub groups: Vec<GroupRecord>,
}

/// Response wrapping a group summary.
#[derive(Debug, Serialize)]
pub struct GroupSummaryResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Aggregated totals and balances.
    pub summary: GroupSummary,
}

async fn create_group(
    State(state): State<AppState>,
    Json(body): Json<CreateGroupRequest>,
) -> ApiResult<impl IntoResponse> {
    let group = state.store.create_group(&body.name, &body.description)?;
    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            success: true,
            group,
        }),
    ))
}

async fn list_groups(State(state): State<AppState>) -> Json<GroupListResponse> {
    Json(GroupListResponse {
        success: true,
        groups: state.store.groups(),
    })
}

async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state.store.group(group_id)?;
    Ok(Json(GroupResponse {
        success: true,
        group,
    }))
}

async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<UpdateGroupRequest>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state.store.update_group(
        group_id,
        &UpdateGroupInput {
            name: body.name,
            description: body.description,
        },
    )?;
    Ok(Json(GroupResponse {
        success: true,
        group,
    }))
}

async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_group(group_id)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Group deleted successfully",
    })))
}

async fn group_summary(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<GroupSummaryResponse>> {
    let summary = state.store.group_summary(group_id)?;
    Ok(Json(GroupSummaryResponse {
        success: true,
        summary,
    }))
}
