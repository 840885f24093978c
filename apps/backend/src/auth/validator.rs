//! Expiry, issuer and audience checks over a claim set.

use time::OffsetDateTime;

use super::claims::{self, ClaimSet};
use super::gate::GateRejection;
use crate::state::SecurityConfig;

/// Treatment of tokens whose `exp` claim is absent or unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingExpiry {
    /// Treat as not expired
    #[default]
    FailOpen,
    /// Treat as expired
    FailClosed,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenValidator<'a> {
    expected_issuer: &'a str,
    expected_audience: &'a str,
    missing_expiry: MissingExpiry,
}

impl<'a> TokenValidator<'a> {
    pub fn new(security: &'a SecurityConfig) -> Self {
        Self::with_expectations(&security.issuer, &security.audience, security.missing_expiry)
    }

    pub fn with_expectations(
        expected_issuer: &'a str,
        expected_audience: &'a str,
        missing_expiry: MissingExpiry,
    ) -> Self {
        Self {
            expected_issuer,
            expected_audience,
            missing_expiry,
        }
    }

    pub fn is_token_expired(&self, claims: &ClaimSet, now: OffsetDateTime) -> bool {
        self.check_expiry(claims, now).is_err()
    }

    /// `Ok(Some(exp))` for a live token, `Ok(None)` when the policy lets a
    /// token without a usable `exp` through or when a live `exp` lies beyond
    /// the representable calendar range.
    pub fn check_expiry(
        &self,
        claims: &ClaimSet,
        now: OffsetDateTime,
    ) -> Result<Option<OffsetDateTime>, GateRejection> {
        let Some(raw) = claims::expiry_raw(claims) else {
            return match self.missing_expiry {
                MissingExpiry::FailOpen => Ok(None),
                MissingExpiry::FailClosed => Err(GateRejection::MissingClaim),
            };
        };

        let Some(secs) = parse_unix_seconds(raw) else {
            return match self.missing_expiry {
                MissingExpiry::FailOpen => Ok(None),
                MissingExpiry::FailClosed => Err(GateRejection::MalformedClaim),
            };
        };

        // Compared as plain seconds so out-of-calendar values still order.
        if secs <= now.unix_timestamp() {
            Err(GateRejection::ExpiredToken)
        } else {
            Ok(OffsetDateTime::from_unix_timestamp(secs).ok())
        }
    }

    /// Exact string equality; a missing claim is invalid.
    pub fn is_issuer_valid(&self, claims: &ClaimSet) -> bool {
        claims::issuer(claims) == Some(self.expected_issuer)
    }

    pub fn is_audience_valid(&self, claims: &ClaimSet) -> bool {
        claims::audience(claims) == Some(self.expected_audience)
    }
}

// NumericDate may carry a fractional part; the fraction is dropped and
// values beyond the i64 range saturate.
fn parse_unix_seconds(raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(secs) => Some(secs),
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64),
    }
}
