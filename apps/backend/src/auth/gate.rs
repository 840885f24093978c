//! Access gate: turns a claim set into an accepted principal or a rejection.
//!
//! Evaluation is pure and synchronous. Handlers use the predicate forms
//! (`is_authenticated`, `is_teacher`, `is_student`), which collapse every
//! rejection to `None`; `authenticate`/`authorize` keep the reason for
//! diagnostics.

use thiserror::Error;
use time::OffsetDateTime;

use super::claims::{self, names, ClaimSet, Role};
use super::validator::TokenValidator;
use crate::state::SecurityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("required claim is missing")]
    MissingClaim,
    #[error("claim value could not be parsed")]
    MalformedClaim,
    #[error("token has expired")]
    ExpiredToken,
    #[error("issuer does not match")]
    IssuerMismatch,
    #[error("audience does not match")]
    AudienceMismatch,
    #[error("role does not match")]
    RoleMismatch,
}

/// A caller accepted by the gate, valid for one request evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Option<Role>,
    pub issuer: String,
    pub audience: String,
    /// `None` when a missing `exp` was let through by policy, or when `exp`
    /// is live but past the representable calendar range
    pub expiry: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy)]
pub struct AccessGate<'a> {
    validator: TokenValidator<'a>,
    now: OffsetDateTime,
}

impl<'a> AccessGate<'a> {
    pub fn new(security: &'a SecurityConfig) -> Self {
        Self::at(security, OffsetDateTime::now_utc())
    }

    /// Gate evaluating expiry against a fixed instant.
    pub fn at(security: &'a SecurityConfig, now: OffsetDateTime) -> Self {
        Self::with_validator(TokenValidator::new(security), now)
    }

    pub fn with_validator(validator: TokenValidator<'a>, now: OffsetDateTime) -> Self {
        Self { validator, now }
    }

    pub fn authenticate(&self, claims: &ClaimSet) -> Result<Principal, GateRejection> {
        if claims.get(names::NAME_IDENTIFIER).is_none() {
            return Err(GateRejection::MissingClaim);
        }
        let user_id = claims::user_id(claims).ok_or(GateRejection::MalformedClaim)?;

        let expiry = self.validator.check_expiry(claims, self.now)?;

        if !self.validator.is_issuer_valid(claims) {
            return Err(GateRejection::IssuerMismatch);
        }
        if !self.validator.is_audience_valid(claims) {
            return Err(GateRejection::AudienceMismatch);
        }

        Ok(Principal {
            user_id,
            role: claims::role(claims),
            issuer: claims::issuer(claims).unwrap_or_default().to_owned(),
            audience: claims::audience(claims).unwrap_or_default().to_owned(),
            expiry,
        })
    }

    pub fn authorize(&self, claims: &ClaimSet, required: Role) -> Result<Principal, GateRejection> {
        let principal = self.authenticate(claims)?;
        if principal.role == Some(required) {
            Ok(principal)
        } else {
            Err(GateRejection::RoleMismatch)
        }
    }

    pub fn is_authenticated(&self, claims: &ClaimSet) -> Option<i64> {
        self.authenticate(claims).ok().map(|p| p.user_id)
    }

    pub fn is_teacher(&self, claims: &ClaimSet) -> Option<i64> {
        self.authorize(claims, Role::Teacher).ok().map(|p| p.user_id)
    }

    pub fn is_student(&self, claims: &ClaimSet) -> Option<i64> {
        self.authorize(claims, Role::Student).ok().map(|p| p.user_id)
    }
}
