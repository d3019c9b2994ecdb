//! Balance engine routes.
//!
//! Thin wrappers over the engine: each handler takes a fresh snapshot from
//! the store, recomputes, and returns the derived result. Nothing here is
//! cached across calls.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;

use divvy_core::bilateral::resolve_pair;
use divvy_core::ledger::ParticipantBalance;
use divvy_core::settlement::{Settlement, solve_settlements};
use divvy_shared::types::{GroupId, ParticipantId};
use divvy_shared::AppError;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the balance engine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/balances", get(group_balances))
        .route("/groups/{group_id}/settlements", get(group_settlements))
        .route(
            "/groups/{group_id}/participants/{participant_id}/summary",
            get(participant_summary),
        )
        .route(
            "/groups/{group_id}/bilateral/{participant_a}/{participant_b}",
            get(bilateral_balance),
        )
}

/// Response for the combined balances + settlements query.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Per-participant balances keyed by participant id.
    pub balances: BTreeMap<ParticipantId, ParticipantBalance>,
    /// Settlement plan clearing those balances.
    pub settlements: Vec<Settlement>,
}

/// Response for the settlements-only query.
#[derive(Debug, Serialize)]
pub struct SettlementsResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Settlement plan for the group.
    pub settlements: Vec<Settlement>,
}

/// A single participant's balance summary.
#[derive(Debug, Serialize)]
pub struct ParticipantSummary {
    /// Total the participant paid.
    pub total_spent: Decimal,
    /// Total of the participant's shares.
    pub total_owed: Decimal,
    /// Net position.
    pub net_balance: Decimal,
}

/// Response for the participant summary query.
#[derive(Debug, Serialize)]
pub struct ParticipantSummaryResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The participant's summary.
    pub summary: ParticipantSummary,
}

/// Directional totals between two participants.
#[derive(Debug, Serialize)]
pub struct BilateralBalance {
    /// First participant of the pair.
    pub participant_a: ParticipantId,
    /// Second participant of the pair.
    pub participant_b: ParticipantId,
    /// What A owes B.
    pub a_owes_b: Decimal,
    /// What B owes A.
    pub b_owes_a: Decimal,
    /// `b_owes_a - a_owes_b`; positive means B should pay A.
    pub net_balance: Decimal,
}

/// Response for the bilateral query.
#[derive(Debug, Serialize)]
pub struct BilateralResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The pairwise balance.
    pub bilateral: BilateralBalance,
}

async fn group_balances(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<BalancesResponse>> {
    let balances = state.store.balances(group_id)?;
    let settlements = solve_settlements(&balances);
    Ok(Json(BalancesResponse {
        success: true,
        balances,
        settlements,
    }))
}

async fn group_settlements(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<SettlementsResponse>> {
    let balances = state.store.balances(group_id)?;
    Ok(Json(SettlementsResponse {
        success: true,
        settlements: solve_settlements(&balances),
    }))
}

async fn participant_summary(
    State(state): State<AppState>,
    Path((group_id, participant_id)): Path<(GroupId, ParticipantId)>,
) -> ApiResult<Json<ParticipantSummaryResponse>> {
    let balances = state.store.balances(group_id)?;
    let balance = balances
        .get(&participant_id)
        .ok_or_else(|| AppError::NotFound(format!("Participant {participant_id}")))?;

    Ok(Json(ParticipantSummaryResponse {
        success: true,
        summary: ParticipantSummary {
            total_spent: balance.total_paid,
            total_owed: balance.total_owed,
            net_balance: balance.net_balance,
        },
    }))
}

async fn bilateral_balance(
    State(state): State<AppState>,
    Path((group_id, participant_a, participant_b)): Path<(GroupId, ParticipantId, ParticipantId)>,
) -> ApiResult<Json<BilateralResponse>> {
    let snapshot = state.store.snapshot(group_id)?;
    for id in [participant_a, participant_b] {
        if !snapshot.participants.iter().any(|p| p.id == id) {
            return Err(AppError::NotFound(format!("Participant {id}")).into());
        }
    }

    let pair = resolve_pair(
        participant_a,
        participant_b,
        &snapshot.expenses,
        &snapshot.splits,
    );
    Ok(Json(BilateralResponse {
        success: true,
        bilateral: BilateralBalance {
            participant_a,
            participant_b,
            a_owes_b: pair.a_owes_b,
            b_owes_a: pair.b_owes_a,
            net_balance: pair.net,
        },
    }))
}
