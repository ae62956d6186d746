//! Distribution rule routes, scoped to the caller.
//!
//! A rule sends a percentage of incoming money to one of the caller's
//! accounts. Percentages across a user's rules never total more than 100.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{error_response, forbidden, not_found},
    middleware::AuthUser,
};
use transposit_db::repositories::{
    CreateDistributionRuleInput, DistributionRuleRepository, RuleRecord,
    UpdateDistributionRuleInput,
};

/// Creates the distribution rules router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/distributionrules", post(create_rule))
        .route("/distributionrules/user/{user_id}", get(list_user_rules))
        .route(
            "/distributionrules/{id}",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
}

/// Request body for creating a rule.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    /// Target account, owned by the caller.
    pub account_id: Uuid,
    /// Share of incoming money, 0 to 100.
    pub percentage: Decimal,
}

/// Request body for updating a rule. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRuleRequest {
    /// New target account.
    pub account_id: Option<Uuid>,
    /// New percentage.
    pub percentage: Option<Decimal>,
}

async fn find_owned(
    repo: &DistributionRuleRepository,
    auth: &AuthUser,
    id: Uuid,
) -> Result<RuleRecord, Response> {
    match repo.find_by_id(id).await {
        Ok(Some(rule)) if auth.is(rule.user_id) => Ok(rule),
        Ok(_) => Err(not_found("Distribution rule not found")),
        Err(e) => Err(error_response(e)),
    }
}

/// POST /distributionrules
async fn create_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRuleRequest>,
) -> impl IntoResponse {
    let repo = DistributionRuleRepository::new((*state.db).clone());
    let input = CreateDistributionRuleInput {
        user_id: auth.user_id(),
        account_id: payload.account_id,
        percentage: payload.percentage,
    };

    match repo.create_rule(input).await {
        Ok(rule) => {
            info!(rule_id = %rule.id, account_id = %rule.account_id, "Distribution rule created");
            (StatusCode::CREATED, Json(json!({ "rule": rule }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /distributionrules/{id}
async fn get_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DistributionRuleRepository::new((*state.db).clone());
    match find_owned(&repo, &auth, id).await {
        Ok(rule) => (StatusCode::OK, Json(json!({ "rule": rule }))).into_response(),
        Err(response) => response,
    }
}

/// GET /distributionrules/user/{user_id}
async fn list_user_rules(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is(user_id) {
        return forbidden();
    }

    let repo = DistributionRuleRepository::new((*state.db).clone());
    match repo.list_by_user(user_id).await {
        Ok(rules) => (StatusCode::OK, Json(json!({ "rules": rules }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /distributionrules/{id}
async fn update_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRuleRequest>,
) -> impl IntoResponse {
    let repo = DistributionRuleRepository::new((*state.db).clone());
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    let input = UpdateDistributionRuleInput {
        account_id: payload.account_id,
        percentage: payload.percentage,
    };

    match repo.update_rule(id, input).await {
        Ok(rule) => {
            info!(rule_id = %id, "Distribution rule updated");
            (StatusCode::OK, Json(json!({ "rule": rule }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /distributionrules/{id} - Returns the deleted rule.
async fn delete_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DistributionRuleRepository::new((*state.db).clone());
    if let Err(response) = find_owned(&repo, &auth, id).await {
        return response;
    }

    match repo.delete_rule(id).await {
        Ok(rule) => {
            info!(rule_id = %id, "Distribution rule deleted");
            (StatusCode::OK, Json(json!({ "rule": rule }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
