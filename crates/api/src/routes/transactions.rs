//! Transaction routes, scoped to the caller.
//!
//! Every search narrows to the caller's rows in SQL. Amount searches then
//! compare decrypted values, so `/amount/1500` also finds `1500.00`.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{error_response, forbidden, not_found, validation_error},
    middleware::AuthUser,
    params::{parse_amount, parse_date},
};
use transposit_core::filter::{AmountFilter, DateWindow};
use transposit_db::entities::sea_orm_active_enums::TransactionStatus;
use transposit_db::repositories::{
    CreateTransactionInput, TransactionFilter, TransactionRepository,
};

/// Creates the transactions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/user/{user_id}", get(list_user_transactions))
        .route(
            "/transactions/account/{account_id}",
            get(list_account_transactions),
        )
        .route("/transactions/amount/{amount}", get(list_by_amount))
        .route("/transactions/date/{date}", get(list_on_date))
        .route("/transactions/before/{date}", get(list_before))
        .route("/transactions/after/{date}", get(list_after))
        .route("/transactions/between/{start}/{end}", get(list_between))
        .route("/transactions/status/{status}", get(list_by_status))
        .route("/transactions/{id}", get(get_transaction))
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// One of the caller's accounts.
    pub account_id: Uuid,
    /// Signed, non-zero amount.
    pub amount: Decimal,
    /// Lifecycle state; `pending` when absent.
    pub status: Option<String>,
    /// When it happened; now when absent.
    pub transaction_date: Option<DateTime<Utc>>,
}

fn transaction_repo(state: &AppState) -> TransactionRepository {
    TransactionRepository::new((*state.db).clone(), state.cipher.clone())
}

/// Runs a filtered listing and renders `{transactions}`.
async fn respond_with(state: &AppState, filter: TransactionFilter) -> Response {
    match transaction_repo(state).list(filter).await {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let status = match payload.status.as_deref().map(TransactionStatus::from_str) {
        Some(Ok(s)) => Some(s),
        Some(Err(e)) => return validation_error(&e),
        None => None,
    };

    let input = CreateTransactionInput {
        user_id: auth.user_id(),
        account_id: payload.account_id,
        amount: payload.amount,
        status,
        transaction_date: payload.transaction_date,
    };

    match transaction_repo(&state).create_transaction(input).await {
        Ok(transaction) => {
            info!(
                transaction_id = %transaction.id,
                account_id = %transaction.account_id,
                "Transaction recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({ "transaction": transaction })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /transactions - All of the caller's transactions, newest first.
async fn list_transactions(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    respond_with(&state, TransactionFilter::for_user(auth.user_id())).await
}

/// GET /transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match transaction_repo(&state).find_by_id(id).await {
        Ok(Some(transaction)) if auth.is(transaction.user_id) => (
            StatusCode::OK,
            Json(json!({ "transaction": transaction })),
        )
            .into_response(),
        Ok(_) => not_found("Transaction not found"),
        Err(e) => error_response(e),
    }
}

/// GET /transactions/user/{user_id}
async fn list_user_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is(user_id) {
        return forbidden();
    }
    respond_with(&state, TransactionFilter::for_user(user_id)).await
}

/// GET /transactions/account/{account_id}
async fn list_account_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let filter = TransactionFilter {
        account_id: Some(account_id),
        ..TransactionFilter::for_user(auth.user_id())
    };
    respond_with(&state, filter).await
}

/// GET /transactions/amount/{amount}
async fn list_by_amount(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(amount): Path<String>,
) -> impl IntoResponse {
    let amount = match parse_amount(&amount) {
        Ok(a) => a,
        Err(response) => return response,
    };
    let filter = TransactionFilter {
        amount: Some(AmountFilter::Equal(amount)),
        ..TransactionFilter::for_user(auth.user_id())
    };
    respond_with(&state, filter).await
}

/// GET /transactions/date/{date}
async fn list_on_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<String>,
) -> impl IntoResponse {
    match parse_date(&date) {
        Ok(day) => respond_in_window(&state, &auth, DateWindow::On(day)).await,
        Err(response) => response,
    }
}

/// GET /transactions/before/{date}
async fn list_before(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<String>,
) -> impl IntoResponse {
    match parse_date(&date) {
        Ok(day) => respond_in_window(&state, &auth, DateWindow::Before(day)).await,
        Err(response) => response,
    }
}

/// GET /transactions/after/{date}
async fn list_after(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<String>,
) -> impl IntoResponse {
    match parse_date(&date) {
        Ok(day) => respond_in_window(&state, &auth, DateWindow::After(day)).await,
        Err(response) => response,
    }
}

/// GET /transactions/between/{start}/{end} - Both days included.
async fn list_between(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((start, end)): Path<(String, String)>,
) -> impl IntoResponse {
    let (start, end) = match (parse_date(&start), parse_date(&end)) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    match DateWindow::between(start, end) {
        Ok(window) => respond_in_window(&state, &auth, window).await,
        Err(e) => validation_error(&e),
    }
}

/// GET /transactions/status/{status}
async fn list_by_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(status): Path<String>,
) -> impl IntoResponse {
    let status = match TransactionStatus::from_str(&status) {
        Ok(s) => s,
        Err(e) => return validation_error(&e),
    };
    let filter = TransactionFilter {
        status: Some(status),
        ..TransactionFilter::for_user(auth.user_id())
    };
    respond_with(&state, filter).await
}

async fn respond_in_window(state: &AppState, auth: &AuthUser, window: DateWindow) -> Response {
    let filter = TransactionFilter {
        window: Some(window),
        ..TransactionFilter::for_user(auth.user_id())
    };
    respond_with(state, filter).await
}
