//! Process configuration, read once from the environment at startup.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use time::Duration;

use super::db::DbKind;
use crate::auth::MissingExpiry;
use crate::error::AppError;
use crate::middleware::cors::parse_allowed_origins;
use crate::state::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Extra sink; stdout is always written
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    pub dir: PathBuf,
    pub interval: StdDuration,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SeedTeacher {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedTeacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedTeacher")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub db_kind: DbKind,
    pub log: LogConfig,
    /// `None` when `BACKUP_DIR` is unset
    pub backup: Option<BackupConfig>,
    pub cors_origins: Vec<String>,
    pub seed_teacher: Option<SeedTeacher>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| {
                AppError::config(format!("Required environment variable '{name}' is not set"))
            })
        };

        let server = ServerConfig {
            host: var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", var("BACKEND_PORT"), 3001)?,
        };

        let ttl_minutes: i64 = parse_or("JWT_TTL_MINUTES", var("JWT_TTL_MINUTES"), 60)?;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl_minutes) {
            return Err(AppError::config(format!(
                "JWT_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
            )));
        }
        let missing_expiry = if parse_or("JWT_REQUIRE_EXP", var("JWT_REQUIRE_EXP"), false)? {
            MissingExpiry::FailClosed
        } else {
            MissingExpiry::FailOpen
        };
        let security = SecurityConfig::new(
            required("JWT_SECRET")?,
            required("JWT_ISSUER")?,
            required("JWT_AUDIENCE")?,
        )
        .with_token_ttl(Duration::minutes(ttl_minutes))
        .with_missing_expiry(missing_expiry);

        let db_kind = match var("DB_KIND") {
            Some(raw) => raw.parse()?,
            None => DbKind::Postgres,
        };

        let backup = match var("BACKUP_DIR") {
            Some(dir) => {
                let hours: u64 = parse_or("BACKUP_INTERVAL_HOURS", var("BACKUP_INTERVAL_HOURS"), 24)?;
                if hours == 0 {
                    return Err(AppError::config("BACKUP_INTERVAL_HOURS must be at least 1"));
                }
                let secs = hours
                    .checked_mul(60 * 60)
                    .ok_or_else(|| AppError::config(format!("BACKUP_INTERVAL_HOURS is too large: {hours}")))?;
                Some(BackupConfig {
                    dir: PathBuf::from(dir),
                    interval: StdDuration::from_secs(secs),
                })
            }
            None => None,
        };

        let seed_teacher = match (var("SEED_TEACHER_USERNAME"), var("SEED_TEACHER_PASSWORD")) {
            (Some(username), Some(password)) => Some(SeedTeacher { username, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::config(
                    "SEED_TEACHER_USERNAME and SEED_TEACHER_PASSWORD must be set together",
                ))
            }
        };

        Ok(Self {
            server,
            security,
            db_kind,
            log: LogConfig {
                file: var("LOG_FILE").map(PathBuf::from),
            },
            backup,
            cors_origins: parse_allowed_origins(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            seed_teacher,
        })
    }
}

// One year
const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T, AppError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {name}: '{value}'"))),
        None => Ok(default),
    }
}
