//! Expense routes.
//!
//! Creating or editing an expense runs the split calculator and persists the
//! expense together with its split rows; the balance endpoints then derive
//! everything from those records.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_core::split::SplitSpec;
use divvy_shared::types::{ExpenseId, GroupId, ParticipantId};
use divvy_store::{
    CreateExpenseInput, ExpenseWithSplits, ParticipantExpenses, UpdateExpenseInput,
};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}", put(update_expense))
        .route("/expenses/{expense_id}", delete(delete_expense))
        .route("/groups/{group_id}/expenses", get(list_expenses))
        .route(
            "/groups/{group_id}/participants/{participant_id}/expenses",
            get(participant_expenses),
        )
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Owning group.
    pub group_id: GroupId,
    /// Participant who paid.
    pub payer_id: ParticipantId,
    /// Amount paid.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
    /// Expense category; defaults to "general".
    pub category: Option<String>,
    /// When the expense happened; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Split specification, e.g. `{"policy": "equal", "entries": [...]}`.
    pub split: SplitSpec,
}

/// Request body for editing an expense.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    /// New amount, if changed.
    pub amount: Option<Decimal>,
    /// New description, if changed.
    pub description: Option<String>,
    /// New category, if changed.
    pub category: Option<String>,
    /// New date, if changed.
    pub date: Option<DateTime<Utc>>,
    /// Replacement split specification.
    pub split: SplitSpec,
}

/// Response wrapping one expense with its splits.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The expense and its split rows.
    #[serde(flatten)]
    pub expense: ExpenseWithSplits,
}

/// Response wrapping a group's expenses.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Expenses with their splits, newest first.
    pub expenses: Vec<ExpenseWithSplits>,
}

/// Response for a participant's paid/shared expenses.
#[derive(Debug, Serialize)]
pub struct ParticipantExpensesResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Expenses paid by and shared with the participant.
    #[serde(flatten)]
    pub expenses: ParticipantExpenses,
}

async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<CreateExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let created = state.store.create_expense(CreateExpenseInput {
        group_id: body.group_id,
        payer_id: body.payer_id,
        amount: body.amount,
        description: body.description,
        category: body.category,
        date: body.date,
        split: body.split,
    })?;
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse {
            success: true,
            expense: created,
        }),
    ))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = state.store.expense(expense_id)?;
    Ok(Json(ExpenseResponse {
        success: true,
        expense,
    }))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
    Json(body): Json<UpdateExpenseRequest>,
) -> ApiResult<Json<ExpenseResponse>> {
    let updated = state.store.update_expense(
        expense_id,
        UpdateExpenseInput {
            amount: body.amount,
            description: body.description,
            category: body.category,
            date: body.date,
            split: body.split,
        },
    )?;
    Ok(Json(ExpenseResponse {
        success: true,
        expense: updated,
    }))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_expense(expense_id)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Expense deleted successfully",
    })))
}

async fn list_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let expenses = state.store.expenses(group_id)?;
    Ok(Json(ExpenseListResponse {
        success: true,
        expenses,
    }))
}

async fn participant_expenses(
    State(state): State<AppState>,
    Path((group_id, participant_id)): Path<(GroupId, ParticipantId)>,
) -> ApiResult<Json<ParticipantExpensesResponse>> {
    let expenses = state.store.participant_expenses(group_id, participant_id)?;
    Ok(Json(ParticipantExpensesResponse {
        success: true,
        expenses,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use divvy_store::LedgerStore;

    use crate::{AppState, create_router};

    fn test_app() -> Router {
        create_router(AppState {
            store: Arc::new(LedgerStore::new(8)),
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(payload) => Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn seed_group(app: &Router, names: &[&str]) -> (String, Vec<String>) {
        let (_, body) = send(app, "POST", "/api/v1/groups", Some(json!({"name": "Test"}))).await;
        let group_id = body["group"]["id"].as_str().unwrap().to_owned();
        let mut members = Vec::new();
        for name in names {
            let (_, body) = send(
                app,
                "POST",
                &format!("/api/v1/groups/{group_id}/participants"),
                Some(json!({"name": name})),
            )
            .await;
            members.push(body["participant"]["id"].as_str().unwrap().to_owned());
        }
        (group_id, members)
    }

    #[tokio::test]
    async fn test_create_expense_returns_shares() {
        let app = test_app();
        let (group_id, members) = seed_group(&app, &["Alice", "Bob", "Carol"]).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "group_id": group_id,
                "payer_id": members[0],
                "amount": "100.00",
                "description": "Dinner",
                "split": {"policy": "equal", "entries": members},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        let splits = body["splits"].as_array().unwrap();
        assert_eq!(splits.len(), 3);
        // The remainder lands on the last listed participant.
        for split in splits {
            let expected = if split["participant_id"] == json!(&members[2]) {
                json!("33.34")
            } else {
                json!("33.33")
            };
            assert_eq!(split["share_amount"], expected);
        }
    }

    #[tokio::test]
    async fn test_mismatched_custom_split_is_rejected() {
        let app = test_app();
        let (group_id, members) = seed_group(&app, &["Alice", "Bob"]).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "group_id": group_id,
                "payer_id": members[0],
                "amount": "100.00",
                "description": "Dinner",
                "split": {"policy": "custom", "entries": [
                    {"participant_id": members[0], "amount": "60.00"},
                    {"participant_id": members[1], "amount": "40.02"},
                ]},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));

        // Nothing may be persisted from the rejected request.
        let (_, body) = send(
            &app,
            "GET",
            &format!("/api/v1/groups/{group_id}/expenses"),
            None,
        )
        .await;
        assert!(body["expenses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_custom_share_is_rejected() {
        let app = test_app();
        let (group_id, members) = seed_group(&app, &["Alice", "Bob"]).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "group_id": group_id,
                "payer_id": members[0],
                "amount": "100.00",
                "description": "Dinner",
                "split": {"policy": "custom", "entries": [
                    {"participant_id": members[0], "amount": "150.00"},
                    {"participant_id": members[1], "amount": "-50.00"},
                ]},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_payer_outside_group_is_rejected() {
        let app = test_app();
        let (group_id, members) = seed_group(&app, &["Alice"]).await;

        let outsider = uuid::Uuid::now_v7();
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "group_id": group_id,
                "payer_id": outsider,
                "amount": "10.00",
                "description": "Coffee",
                "split": {"policy": "equal", "entries": members},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_expense_returns_404() {
        let app = test_app();
        let expense_id = uuid::Uuid::now_v7();
        let (status, body) =
            send(&app, "GET", &format!("/api/v1/expenses/{expense_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_update_expense_replaces_splits() {
        let app = test_app();
        let (group_id, members) = seed_group(&app, &["Alice", "Bob"]).await;

        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "group_id": group_id,
                "payer_id": members[0],
                "amount": "40.00",
                "description": "Lunch",
                "split": {"policy": "equal", "entries": members},
            })),
        )
        .await;
        let expense_id = body["expense"]["id"].as_str().unwrap().to_owned();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/expenses/{expense_id}"),
            Some(json!({
                "amount": "60.00",
                "split": {"policy": "percentage", "entries": [
                    {"participant_id": members[0], "percentage": "25"},
                    {"participant_id": members[1], "percentage": "75"},
                ]},
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let splits = body["splits"].as_array().unwrap();
        assert_eq!(splits.len(), 2);
        for split in splits {
            let expected = if split["participant_id"] == json!(&members[0]) {
                json!("15.00")
            } else {
                json!("45.00")
            };
            assert_eq!(split["share_amount"], expected);
        }
    }
}
