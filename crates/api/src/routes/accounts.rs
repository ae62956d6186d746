//! Bank account routes, scoped to the caller.
//!
//! Account and routing numbers are encrypted at rest; every body here
//! carries them in plaintext. An account owned by someone else answers
//! `404` exactly like a missing one.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{error_response, forbidden, not_found, validation_error},
    middleware::AuthUser,
};
use transposit_db::entities::sea_orm_active_enums::AccountType;
use transposit_db::repositories::{
    AccountRecord, AccountRepository, CreateAccountInput, UpdateAccountInput,
};

/// Creates the accounts router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/user/{user_id}", get(list_user_accounts))
        .route(
            "/accounts/accountNumber/{account_number}",
            get(get_by_account_number),
        )
        .route(
            "/accounts/routingNumber/{routing_number}",
            get(list_by_routing_number),
        )
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// `savings`, `checking` or `investment`, any case.
    pub account_type: String,
    /// Display name.
    pub account_name: String,
    /// Account number (8-12 characters).
    pub account_number: String,
    /// Nine-digit routing number.
    pub routing_number: String,
}

/// Request body for updating an account. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// New account type.
    pub account_type: Option<String>,
    /// New display name.
    pub account_name: Option<String>,
    /// New account number.
    pub account_number: Option<String>,
    /// New routing number.
    pub routing_number: Option<String>,
}

fn account_repo(state: &AppState) -> AccountRepository {
    AccountRepository::new((*state.db).clone(), state.cipher.clone())
}

/// Loads an account and checks it belongs to the caller.
async fn find_owned(
    repo: &AccountRepository,
    auth: &AuthUser,
    id: Uuid,
) -> Result<AccountRecord, Response> {
    match repo.find_account_by_id(id).await {
        Ok(Some(account)) if auth.is(account.user_id) => Ok(account),
        Ok(_) => Err(not_found("Account not found")),
        Err(e) => Err(error_response(e)),
    }
}

/// POST /accounts
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let account_type = match AccountType::from_str(&payload.account_type) {
        Ok(t) => t,
        Err(e) => return validation_error(&e),
    };

    let input = CreateAccountInput {
        user_id: auth.user_id(),
        account_type,
        account_name: payload.account_name,
        account_number: payload.account_number,
        routing_number: payload.routing_number,
    };

    match account_repo(&state).create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, user_id = %account.user_id, "Account created");
            (StatusCode::CREATED, Json(json!({ "account": account }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /accounts/{id}
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = account_repo(&state);
    match find_owned(&repo, &auth, id).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(response) => response,
    }
}

/// GET /accounts/user/{user_id}
async fn list_user_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is(user_id) {
        return forbidden();
    }

    match account_repo(&state).list_by_user(user_id).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /accounts/accountNumber/{account_number}
async fn get_by_account_number(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_number): Path<String>,
) -> impl IntoResponse {
    match account_repo(&state)
        .find_by_account_number(auth.user_id(), &account_number)
        .await
    {
        Ok(Some(account)) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Ok(None) => not_found("Account not found"),
        Err(e) => error_response(e),
    }
}

/// GET /accounts/routingNumber/{routing_number}
async fn list_by_routing_number(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(routing_number): Path<String>,
) -> impl IntoResponse {
    match account_repo(&state)
        .list_by_routing_number(auth.user_id(), &routing_number)
        .await
    {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /accounts/{id}
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let account_type = match payload.account_type.as_deref().map(AccountType::from_str) {
        Some(Ok(t)) => Some(t),
        Some(Err(e)) => return validation_error(&e),
        None => None,
    };

    let repo = account_repo(&state);
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    let input = UpdateAccountInput {
        account_type,
        account_name: payload.account_name,
        account_number: payload.account_number,
        routing_number: payload.routing_number,
    };

    match repo.update_account(id, input).await {
        Ok(account) => {
            info!(account_id = %id, "Account updated");
            (StatusCode::OK, Json(json!({ "account": account }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /accounts/{id}
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = account_repo(&state);
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    match repo.delete_account(id).await {
        Ok(deleted) => {
            info!(account_id = %deleted, "Account deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Account deleted", "id": deleted })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
