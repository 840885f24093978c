use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use super::claims::{ClaimSet, Role};
use crate::state::SecurityConfig;
use crate::AppError;

/// Claims written into access tokens minted by this service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Numeric user id, as a string
    pub nameid: String,
    pub role: String,
    pub unique_name: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an access token expiring `security.token_ttl` after `now`.
pub fn mint_access_token(
    user_id: i64,
    role: Role,
    username: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now.unix_timestamp();
    let exp = iat + security.token_ttl.whole_seconds();

    let claims = AccessClaims {
        nameid: user_id.to_string(),
        role: role.claim_value().to_string(),
        unique_name: username.to_string(),
        iss: security.issuer.clone(),
        aud: security.audience.clone(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify the signature and algorithm, then flatten the payload.
///
/// Expiry, issuer and audience are not checked here; the access gate
/// decides on those.
pub fn decode_claims(token: &str, security: &SecurityConfig) -> Result<ClaimSet, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| ClaimSet::from_json(data.claims))
    .map_err(|e| {
        if matches!(e.kind(), ErrorKind::InvalidSignature) {
            tracing::debug!("JWT signature mismatch");
        }
        AppError::unauthorized_invalid_jwt()
    })
}
