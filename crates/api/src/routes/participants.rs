//! Participant management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use divvy_shared::types::{GroupId, ParticipantId};
use divvy_store::{ParticipantRecord, UpdateParticipantInput};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the participant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/participants", post(add_participant))
        .route("/groups/{group_id}/participants", get(list_participants))
        .route("/participants/{participant_id}", put(update_participant))
        .route("/participants/{participant_id}", delete(remove_participant))
}

/// Request body for adding a participant.
#[derive(Debug, Deserialize)]
pub struct AddParticipantRequest {
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional display color.
    pub color: Option<String>,
}

/// Request body for updating a participant.
#[derive(Debug, Deserialize)]
pub struct UpdateParticipantRequest {
    /// New display name, if changed.
    pub name: Option<String>,
    /// New email, if changed.
    pub email: Option<String>,
    /// New display color, if changed.
    pub color: Option<String>,
}

/// Response wrapping a single participant.
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The participant record.
    pub participant: ParticipantRecord,
}

/// Response wrapping a group's participants.
#[derive(Debug, Serialize)]
pub struct ParticipantListResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Group members in insertion order.
    pub participants: Vec<ParticipantRecord>,
}

async fn add_participant(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<AddParticipantRequest>,
) -> ApiResult<impl IntoResponse> {
    let participant = state
        .store
        .add_participant(group_id, &body.name, body.email, body.color)?;
    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse {
            success: true,
            participant,
        }),
    ))
}

async fn list_participants(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<ParticipantListResponse>> {
    let participants = state.store.participants(group_id)?;
    Ok(Json(ParticipantListResponse {
        success: true,
        participants,
    }))
}

async fn update_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<ParticipantId>,
    Json(body): Json<UpdateParticipantRequest>,
) -> ApiResult<Json<ParticipantResponse>> {
    let participant = state.store.update_participant(
        participant_id,
        &UpdateParticipantInput {
            name: body.name,
            email: body.email,
            color: body.color,
        },
    )?;
    Ok(Json(ParticipantResponse {
        success: true,
        participant,
    }))
}

async fn remove_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<ParticipantId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.remove_participant(participant_id)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Participant removed successfully",
    })))
}
