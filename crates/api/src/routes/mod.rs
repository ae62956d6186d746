//! API route definitions.

use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod distribution_rules;
pub mod health;
pub mod incoming_deposits;
pub mod transactions;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(incoming_deposits::routes())
        .merge(distribution_rules::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .route("/", get(api_index))
        .merge(health::routes())
        .merge(users::public_routes())
        .merge(protected_routes)
}

async fn api_index() -> Json<Value> {
    Json(json!({ "message": "API is running." }))
}
