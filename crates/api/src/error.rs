//! JSON error responses.
//!
//! Every error body has the shape `{"error": "<code>", "message": "<text>"}`.
//! Server-side failures are logged here and reach the client only as a
//! generic `internal_error`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use transposit_core::validation::ValidationError;
use transposit_shared::AppError;

/// Builds a response with the given status, error code and message.
pub fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Converts any error that maps onto [`AppError`] into a response.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    if err.is_server_error() {
        error!(error = %err, "Request failed");
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, err.error_code(), &err.public_message())
}

/// 400 for a rejected input value.
pub fn validation_error(err: &ValidationError) -> Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        &err.to_string(),
    )
}

/// 404 with a resource-specific message.
pub fn not_found(message: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// 403 for a path that names another user.
pub fn forbidden() -> Response {
    json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "You can only access your own resources",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = error_response(AppError::Encryption("bad tag on row 42".to_string()));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert!(!body["message"].as_str().unwrap().contains("row 42"));
    }

    #[tokio::test]
    async fn test_client_errors_keep_message() {
        let response = error_response(AppError::Conflict("Username taken".to_string()));

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], "Username taken");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let response = validation_error(&ValidationError::ZeroAmount);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
    }
}
