//! Per-handler access gating.
//!
//! `JwtExtract` has already verified the signature and stored the
//! `ClaimSet`; these extractors run the access gate over it. Every rejection
//! becomes the same 401 `UNAUTHORIZED`, whatever the reason.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use tracing::debug;

use crate::auth::{AccessGate, ClaimSet, GateRejection, Principal, Role};
use crate::error::AppError;
use crate::state::AppState;

/// Any caller that passes authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    /// May be absent: authentication does not require a role claim
    pub role: Option<Role>,
}

impl CurrentUser {
    pub fn is_teacher(&self) -> bool {
        self.role == Some(Role::Teacher)
    }
}

/// Caller authorized as a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeacherUser {
    pub id: i64,
}

/// Caller authorized as a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentUser {
    pub id: i64,
}

/// Gate decision left in the request extensions for the request logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted { user_id: i64 },
    Denied,
}

impl GateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateOutcome::Granted { .. } => "granted",
            GateOutcome::Denied => "denied",
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            GateOutcome::Granted { user_id } => Some(*user_id),
            GateOutcome::Denied => None,
        }
    }
}

fn run_gate<T>(
    req: &HttpRequest,
    evaluate: impl FnOnce(&AccessGate<'_>, &ClaimSet) -> Option<T>,
) -> Result<T, AppError>
where
    T: Copy + Into<CurrentUser>,
{
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let granted = {
        let extensions = req.extensions();
        let gate = AccessGate::new(&state.security);
        extensions
            .get::<ClaimSet>()
            .and_then(|claims| evaluate(&gate, claims))
    };

    let outcome = match granted {
        Some(user) => GateOutcome::Granted {
            user_id: Into::<CurrentUser>::into(user).id,
        },
        None => GateOutcome::Denied,
    };
    req.extensions_mut().insert(outcome);

    granted.ok_or_else(AppError::unauthorized)
}

fn log_rejection(rejection: GateRejection) {
    debug!(%rejection, "access gate rejected request");
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(run_gate(req, |gate, claims| {
            gate.authenticate(claims)
                .map_err(log_rejection)
                .ok()
                .map(|Principal { user_id, role, .. }| CurrentUser { id: user_id, role })
        }))
    }
}

impl FromRequest for TeacherUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(run_gate(req, |gate, claims| {
            gate.is_teacher(claims).map(|id| TeacherUser { id })
        }))
    }
}

impl FromRequest for StudentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(run_gate(req, |gate, claims| {
            gate.is_student(claims).map(|id| StudentUser { id })
        }))
    }
}

impl From<TeacherUser> for CurrentUser {
    fn from(user: TeacherUser) -> Self {
        CurrentUser {
            id: user.id,
            role: Some(Role::Teacher),
        }
    }
}

impl From<StudentUser> for CurrentUser {
    fn from(user: StudentUser) -> Self {
        CurrentUser {
            id: user.id,
            role: Some(Role::Student),
        }
    }
}
