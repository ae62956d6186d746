//! User routes: registration, login, profile lookup and self-service edits.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    error::{error_response, forbidden, json_error, not_found, validation_error},
    middleware::AuthUser,
};
use transposit_core::auth::{hash_password, spend_verification_time, verify_password};
use transposit_core::validation::validate_password;
use transposit_db::entities::users;
use transposit_db::repositories::{CreateUserInput, UpdateUserInput, UserRepository};
use transposit_shared::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateUserRequest, UserInfo,
};

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Routes that require a token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route("/users/username/{username}", get(get_user_by_username))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        phone_number: user.phone_number,
        date_of_birth: user.date_of_birth,
        created_at: user.created_at.with_timezone(&Utc),
    }
}

fn internal_error(message: &str) -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
}

/// POST /users/register - Create a user and return a token for them.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_password(&payload.password) {
        return validation_error(&e);
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo
        .create(CreateUserInput {
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone_number: payload.phone_number,
            date_of_birth: payload.date_of_birth,
        })
        .await
    {
        Ok(u) => u,
        Err(e) => return error_response(e),
    };

    let token = match state
        .jwt_service
        .generate_access_token(user.id, &user.username)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("An error occurred during registration");
        }
    };

    info!(user_id = %user.id, "User registered");

    (
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Thank you for signing up.".to_string(),
            user: user_info(user),
            token,
        }),
    )
        .into_response()
}

/// POST /users/login - Check credentials and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Username and password are required",
        );
    }

    let invalid_credentials = || {
        json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid username or password",
        )
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_username(payload.username.trim()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            spend_verification_time(&payload.password);
            info!("Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let token = match state
        .jwt_service
        .generate_access_token(user.id, &user.username)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    (
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token,
            expires_in: state.jwt_service.access_token_expires_in(),
        }),
    )
        .into_response()
}

/// GET /users - List all users.
async fn list_users(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.list().await {
        Ok(list) => {
            let users: Vec<UserInfo> = list.into_iter().map(user_info).collect();
            (StatusCode::OK, Json(json!({ "users": users }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /users/me - The caller's own profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!({ "user": user_info(user) }))).into_response(),
        Ok(None) => not_found("User not found"),
        Err(e) => error_response(e),
    }
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!({ "user": user_info(user) }))).into_response(),
        Ok(None) => not_found("User not found"),
        Err(e) => error_response(e),
    }
}

/// GET /users/username/{username}
async fn get_user_by_username(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_username(username.trim()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!({ "user": user_info(user) }))).into_response(),
        Ok(None) => not_found("User not found"),
        Err(e) => error_response(e),
    }
}

/// PUT /users/{id} - Update the caller's own profile.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if !auth.is(id) {
        return forbidden();
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            if let Err(e) = validate_password(password) {
                return validation_error(&e);
            }
            match hash_password(password) {
                Ok(h) => Some(h),
                Err(e) => {
                    error!(error = %e, "Failed to hash password");
                    return internal_error("An error occurred while updating the user");
                }
            }
        }
        None => None,
    };

    let input = UpdateUserInput {
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
        date_of_birth: payload.date_of_birth,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.update(id, input).await {
        Ok(user) => {
            info!(user_id = %id, "User updated");
            (StatusCode::OK, Json(json!({ "user": user_info(user) }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE /users/{id} - Delete the caller and everything they own.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is(id) {
        return forbidden();
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.delete(id).await {
        Ok(user) => {
            info!(user_id = %id, "User deleted");
            (StatusCode::OK, Json(json!({ "user": user_info(user) }))).into_response()
        }
        Err(e) => error_response(e),
    }
}
