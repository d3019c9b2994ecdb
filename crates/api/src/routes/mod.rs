//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod balance;
pub mod expenses;
pub mod groups;
pub mod health;
pub mod participants;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(groups::routes())
        .merge(participants::routes())
        .merge(expenses::routes())
        .merge(balance::routes())
}
