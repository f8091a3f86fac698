use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

const SECRET: &str = "test-secret-key-for-testing";

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        token_expires_secs: 3_600,
    })
}

#[test]
fn test_claims_new_sets_fields() {
    let expires_at = Utc::now() + Duration::hours(1);
    let before = Utc::now().timestamp();
    let claims = Claims::new("alice", expires_at);

    assert_eq!(claims.username(), "alice");
    assert!(claims.iat >= before);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_generate_and_validate_round_trip() {
    let service = create_test_service();

    let token = service.generate_token("alice").unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.username(), "alice");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::Invalid(_))));
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "some-other-secret".to_string(),
        token_expires_secs: 3_600,
    });
    let token = other.generate_token("mallory").unwrap();

    let result = create_test_service().validate_token(&token);
    assert!(matches!(result, Err(JwtError::Invalid(_))));
}

#[test]
fn test_expired_token() {
    let claims = Claims {
        sub: "alice".to_string(),
        iat: (Utc::now() - Duration::hours(3)).timestamp(),
        exp: (Utc::now() - Duration::hours(2)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = create_test_service().validate_token(&token);
    assert!(matches!(result, Err(JwtError::Expired)));
}

#[test]
fn test_debug_hides_keys() {
    let rendered = format!("{:?}", create_test_service());
    assert!(rendered.contains("[hidden]"));
    assert!(!rendered.contains(SECRET));
}

#[test]
fn test_auth_response_shape() {
    let body = serde_json::to_value(crate::auth::AuthResponse {
        token: "abc".to_string(),
    })
    .unwrap();
    assert_eq!(body, serde_json::json!({ "token": "abc" }));
}
