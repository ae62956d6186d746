//! Tests for application error mapping.

use rstest::rstest;

use super::error::AppError;

#[rstest]
#[case(AppError::Unauthorized("test".into()), 401)]
#[case(AppError::Forbidden("test".into()), 403)]
#[case(AppError::NotFound("test".into()), 404)]
#[case(AppError::Validation("test".into()), 400)]
#[case(AppError::BusinessRule("test".into()), 422)]
#[case(AppError::Conflict("test".into()), 409)]
#[case(AppError::Database("test".into()), 500)]
#[case(AppError::Encryption("test".into()), 500)]
#[case(AppError::Internal("test".into()), 500)]
fn test_app_error_status_codes(#[case] error: AppError, #[case] expected: u16) {
    assert_eq!(error.status_code(), expected);
}

#[rstest]
#[case(AppError::Unauthorized("test".into()), "unauthorized")]
#[case(AppError::Forbidden("test".into()), "forbidden")]
#[case(AppError::NotFound("test".into()), "not_found")]
#[case(AppError::Validation("test".into()), "validation_error")]
#[case(AppError::BusinessRule("test".into()), "business_rule_violation")]
#[case(AppError::Conflict("test".into()), "conflict")]
#[case(AppError::Database("test".into()), "internal_error")]
#[case(AppError::Encryption("test".into()), "internal_error")]
#[case(AppError::Internal("test".into()), "internal_error")]
fn test_app_error_error_codes(#[case] error: AppError, #[case] expected: &str) {
    assert_eq!(error.error_code(), expected);
}

#[test]
fn test_error_display() {
    assert_eq!(
        AppError::Unauthorized("msg".into()).to_string(),
        "Authentication failed: msg"
    );
    assert_eq!(
        AppError::Validation("msg".into()).to_string(),
        "Validation error: msg"
    );
    assert_eq!(
        AppError::Encryption("msg".into()).to_string(),
        "Encryption error: msg"
    );
}

#[test]
fn test_server_errors_hide_details() {
    let error = AppError::Encryption("decryption failed: wrong key or corrupted data".into());
    assert!(error.is_server_error());
    assert_eq!(error.public_message(), "An error occurred");

    let error = AppError::Database("connection refused".into());
    assert_eq!(error.public_message(), "An error occurred");
}

#[test]
fn test_client_errors_keep_message() {
    let error = AppError::Validation("Invalid routing number".into());
    assert!(!error.is_server_error());
    assert_eq!(error.public_message(), "Invalid routing number");
}
