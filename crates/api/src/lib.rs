//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for users, accounts, transactions, incoming deposits
//!   and distribution rules
//! - Authentication middleware
//! - Path parameter parsing and JSON error responses

pub mod error;
pub mod middleware;
pub mod params;
pub mod routes;

use axum::{Json, Router, routing::get};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use transposit_core::crypto::FieldCipher;
use transposit_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Cipher for encrypted columns.
    pub cipher: Arc<dyn FieldCipher>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Transposit" }))
}
