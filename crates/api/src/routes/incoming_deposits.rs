//! Incoming deposit routes, scoped to the caller.
//!
//! Responses use the `fund` / `funds` keys.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
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
use transposit_db::repositories::{
    CreateDepositInput, DepositFilter, DepositRecord, IncomingDepositRepository,
    UpdateDepositInput,
};

/// Creates the incoming deposits router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/incomingDeposits", post(create_deposit))
        .route("/incomingDeposits/user/{user_id}", get(list_user_deposits))
        .route("/incomingDeposits/amount/{amount}", get(list_amount_equal))
        .route(
            "/incomingDeposits/amount/above/{amount}",
            get(list_amount_above),
        )
        .route(
            "/incomingDeposits/amount/below/{amount}",
            get(list_amount_below),
        )
        .route(
            "/incomingDeposits/amount/between/{min}/{max}",
            get(list_amount_between),
        )
        .route("/incomingDeposits/source/{source}", get(list_by_source))
        .route("/incomingDeposits/before/{date}", get(list_before))
        .route("/incomingDeposits/after/{date}", get(list_after))
        .route("/incomingDeposits/between/{start}/{end}", get(list_between))
        .route(
            "/incomingDeposits/{id}",
            get(get_deposit).put(update_deposit).delete(delete_deposit),
        )
}

/// Request body for recording a deposit.
#[derive(Debug, Deserialize)]
pub struct CreateDepositRequest {
    /// Positive amount.
    pub amount: Decimal,
    /// Where the money came from.
    pub source: String,
    /// When the money arrived; now when absent.
    pub received_date: Option<DateTime<Utc>>,
}

/// Request body for updating a deposit. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDepositRequest {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New source.
    pub source: Option<String>,
    /// New arrival time.
    pub received_date: Option<DateTime<Utc>>,
}

fn deposit_repo(state: &AppState) -> IncomingDepositRepository {
    IncomingDepositRepository::new((*state.db).clone(), state.cipher.clone())
}

async fn find_owned(
    repo: &IncomingDepositRepository,
    auth: &AuthUser,
    id: Uuid,
) -> Result<DepositRecord, Response> {
    match repo.find_by_id(id).await {
        Ok(Some(deposit)) if auth.is(deposit.user_id) => Ok(deposit),
        Ok(_) => Err(not_found("Incoming deposit not found")),
        Err(e) => Err(error_response(e)),
    }
}

async fn respond_with(state: &AppState, filter: DepositFilter) -> Response {
    match deposit_repo(state).list(filter).await {
        Ok(funds) => (StatusCode::OK, Json(json!({ "funds": funds }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn respond_with_amount(state: &AppState, auth: &AuthUser, amount: AmountFilter) -> Response {
    let filter = DepositFilter {
        amount: Some(amount),
        ..DepositFilter::for_user(auth.user_id())
    };
    respond_with(state, filter).await
}

async fn respond_in_window(state: &AppState, auth: &AuthUser, window: DateWindow) -> Response {
    let filter = DepositFilter {
        window: Some(window),
        ..DepositFilter::for_user(auth.user_id())
    };
    respond_with(state, filter).await
}

/// POST /incomingDeposits
async fn create_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDepositRequest>,
) -> impl IntoResponse {
    let input = CreateDepositInput {
        user_id: auth.user_id(),
        amount: payload.amount,
        source: payload.source,
        received_date: payload.received_date,
    };

    match deposit_repo(&state).create_deposit(input).await {
        Ok(fund) => {
            info!(deposit_id = %fund.id, user_id = %fund.user_id, "Incoming deposit recorded");
            (StatusCode::CREATED, Json(json!({ "fund": fund }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /incomingDeposits/{id}
async fn get_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = deposit_repo(&state);
    match find_owned(&repo, &auth, id).await {
        Ok(fund) => (StatusCode::OK, Json(json!({ "fund": fund }))).into_response(),
        Err(response) => response,
    }
}

/// GET /incomingDeposits/user/{user_id}
async fn list_user_deposits(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is(user_id) {
        return forbidden();
    }
    respond_with(&state, DepositFilter::for_user(user_id)).await
}

/// GET /incomingDeposits/amount/{amount}
async fn list_amount_equal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(amount): Path<String>,
) -> impl IntoResponse {
    match parse_amount(&amount) {
        Ok(a) => respond_with_amount(&state, &auth, AmountFilter::Equal(a)).await,
        Err(response) => response,
    }
}

/// GET /incomingDeposits/amount/above/{amount}
async fn list_amount_above(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(amount): Path<String>,
) -> impl IntoResponse {
    match parse_amount(&amount) {
        Ok(a) => respond_with_amount(&state, &auth, AmountFilter::Above(a)).await,
        Err(response) => response,
    }
}

/// GET /incomingDeposits/amount/below/{amount}
async fn list_amount_below(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(amount): Path<String>,
) -> impl IntoResponse {
    match parse_amount(&amount) {
        Ok(a) => respond_with_amount(&state, &auth, AmountFilter::Below(a)).await,
        Err(response) => response,
    }
}

/// GET /incomingDeposits/amount/between/{min}/{max} - Both bounds included.
async fn list_amount_between(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((min, max)): Path<(String, String)>,
) -> impl IntoResponse {
    let (min, max) = match (parse_amount(&min), parse_amount(&max)) {
        (Ok(lo), Ok(hi)) => (lo, hi),
        (Err(response), _) | (_, Err(response)) => return response,
    };
    match AmountFilter::between(min, max) {
        Ok(amount) => respond_with_amount(&state, &auth, amount).await,
        Err(e) => validation_error(&e),
    }
}

/// GET /incomingDeposits/source/{source}
async fn list_by_source(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(source): Path<String>,
) -> impl IntoResponse {
    let filter = DepositFilter {
        source: Some(source),
        ..DepositFilter::for_user(auth.user_id())
    };
    respond_with(&state, filter).await
}

/// GET /incomingDeposits/before/{date}
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

/// GET /incomingDeposits/after/{date}
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

/// GET /incomingDeposits/between/{start}/{end} - Both days included.
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

/// PUT /incomingDeposits/{id}
async fn update_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepositRequest>,
) -> impl IntoResponse {
    let repo = deposit_repo(&state);
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    let input = UpdateDepositInput {
        amount: payload.amount,
        source: payload.source,
        received_date: payload.received_date,
    };

    match repo.update_deposit(id, input).await {
        Ok(fund) => {
            info!(deposit_id = %id, "Incoming deposit updated");
            (StatusCode::OK, Json(json!({ "fund": fund }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /incomingDeposits/{id} - Returns the deleted deposit.
async fn delete_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = deposit_repo(&state);
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    match repo.delete_deposit(id).await {
        Ok(fund) => {
            info!(deposit_id = %id, "Incoming deposit deleted");
            (StatusCode::OK, Json(json!({ "fund": fund }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
