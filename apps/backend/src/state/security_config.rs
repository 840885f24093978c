use std::fmt;

use jsonwebtoken::Algorithm;
use time::Duration;

use crate::auth::validator::MissingExpiry;

/// JWT signing settings plus the issuer/audience every token must carry.
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Defaults to HS256
    pub algorithm: Algorithm,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Lifetime of minted access tokens
    pub token_ttl: Duration,
    /// How tokens without a usable `exp` claim are treated
    pub missing_expiry: MissingExpiry,
}

impl SecurityConfig {
    pub fn new(
        jwt_secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            audience: audience.into(),
            token_ttl: Duration::minutes(60),
            missing_expiry: MissingExpiry::default(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_missing_expiry(mut self, policy: MissingExpiry) -> Self {
        self.missing_expiry = policy;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(
            b"default_secret_for_tests_only".to_vec(),
            "gradebook",
            "gradebook-web",
        )
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl", &self.token_ttl)
            .field("missing_expiry", &self.missing_expiry)
            .finish()
    }
}
