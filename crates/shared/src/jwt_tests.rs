//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::JwtSettings;
use crate::jwt::{JwtConfig, JwtError, JwtService};

const SECRET: &str = "test-secret-key-for-testing";

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_secs: 900,
    })
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let before = Utc::now().timestamp();
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(user_id, "alice", expires_at);

    let after = Utc::now().timestamp();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.username, "alice");
    assert!(claims.iat >= before);
    assert!(claims.iat <= after);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service.generate_access_token(user_id, "alice").unwrap();
    assert!(!token.is_empty());

    let claims = service.validate_token(&token).unwrap();
    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.username, "alice");
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expires_secs: 900,
    });
    let token = other.generate_access_token(Uuid::new_v4(), "mallory").unwrap();

    let result = create_test_service().validate_token(&token);
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_expired_token() {
    let service = create_test_service();
    let claims = Claims::new(Uuid::new_v4(), "alice", Utc::now() - Duration::hours(2));
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = service.validate_token(&token);
    assert!(matches!(result, Err(JwtError::Expired)));
}

#[test]
fn test_config_from_settings() {
    let settings = JwtSettings {
        secret: "from-settings".to_string(),
        access_token_expiry_secs: 3600,
    };

    let config = JwtConfig::from(&settings);
    assert_eq!(config.secret, "from-settings");
    assert_eq!(config.access_token_expires_secs, 3600);

    let service = JwtService::new(config);
    assert_eq!(service.access_token_expires_in(), 3600);
}

#[test]
fn test_debug_hides_secret() {
    let debug = format!("{:?}", create_test_service());
    assert!(!debug.contains(SECRET));
}
