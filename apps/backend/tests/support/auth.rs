//! JWT helpers for tests

use gradebook::auth::jwt::mint_access_token;
use gradebook::auth::Role;
use gradebook::state::SecurityConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

/// Issuer/audience shared by test states
pub const TEST_ISSUER: &str = "gradebook-test";
pub const TEST_AUDIENCE: &str = "gradebook-test-web";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(
        "test_secret_key_for_testing_purposes_only",
        TEST_ISSUER,
        TEST_AUDIENCE,
    )
}

/// Full `Authorization` header value for a freshly minted token
pub fn bearer(user_id: i64, role: Role, sec: &SecurityConfig) -> String {
    let token = mint_access_token(user_id, role, "tester", OffsetDateTime::now_utc(), sec)
        .expect("should mint token");
    format!("Bearer {token}")
}

/// Token that expired an hour ago
pub fn expired_bearer(user_id: i64, role: Role, sec: &SecurityConfig) -> String {
    let issued = OffsetDateTime::now_utc() - sec.token_ttl - Duration::hours(1);
    let token =
        mint_access_token(user_id, role, "tester", issued, sec).expect("should mint token");
    format!("Bearer {token}")
}

/// Signs arbitrary claims with the configured secret, for tokens this
/// service would never mint itself.
pub fn bearer_with_claims(claims: Value, sec: &SecurityConfig) -> String {
    let token = encode(
        &Header::new(sec.algorithm),
        &claims,
        &EncodingKey::from_secret(&sec.jwt_secret),
    )
    .expect("should encode custom claims");
    format!("Bearer {token}")
}

pub fn future_exp() -> i64 {
    (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp()
}
