//! Error codes for the gradebook API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. Every code
//! maps 1:1 to the SCREAMING_SNAKE_CASE string that appears in responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required, or the access gate rejected the token
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Token signature or structure is invalid
    UnauthorizedInvalidJwt,
    /// Username/password pair did not match
    InvalidCredentials,
    /// Caller is authenticated but may not touch this resource
    Forbidden,

    // Request Validation
    ValidationError,
    BadRequest,
    InvalidJson,

    // Resource Not Found
    UserNotFound,
    ClassNotFound,
    CourseNotFound,
    AssignmentNotFound,
    GradeNotFound,
    NotFound,

    // Conflicts
    UsernameTaken,
    ClassNameTaken,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Canonical wire string for this code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidJson => "INVALID_JSON",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ClassNotFound => "CLASS_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::AssignmentNotFound => "ASSIGNMENT_NOT_FOUND",
            Self::GradeNotFound => "GRADE_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::ClassNameTaken => "CLASS_NAME_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
