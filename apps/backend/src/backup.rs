//! Periodic JSON export of the whole gradebook.

use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::BackupConfig;
use crate::entities::{assignments, classes, courses, grades, users};
use crate::entities::{Assignments, Classes, Courses, Grades, Users};
use crate::error::AppError;

pub const BACKUP_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct BackupDocument {
    format_version: u32,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    /// Password hashes are never serialized
    users: Vec<users::Model>,
    classes: Vec<classes::Model>,
    courses: Vec<courses::Model>,
    assignments: Vec<assignments::Model>,
    grades: Vec<grades::Model>,
}

async fn snapshot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    created_at: OffsetDateTime,
) -> Result<BackupDocument, AppError> {
    Ok(BackupDocument {
        format_version: BACKUP_FORMAT_VERSION,
        created_at,
        users: Users::find().order_by_asc(users::Column::Id).all(conn).await?,
        classes: Classes::find().order_by_asc(classes::Column::Id).all(conn).await?,
        courses: Courses::find().order_by_asc(courses::Column::Id).all(conn).await?,
        assignments: Assignments::find()
            .order_by_asc(assignments::Column::Id)
            .all(conn)
            .await?,
        grades: Grades::find().order_by_asc(grades::Column::Id).all(conn).await?,
    })
}

fn backup_file_name(at: OffsetDateTime) -> Result<String, AppError> {
    let stamp = at
        .format(format_description!(
            "[year][month][day]T[hour][minute][second][subsecond digits:3]Z"
        ))
        .map_err(|e| AppError::internal(format!("Failed to format backup timestamp: {e}")))?;
    Ok(format!("gradebook-backup-{stamp}.json"))
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to {action} {}: {e}", path.display()))
}

/// Write one backup into `dir` and return its path. The file appears
/// atomically: it is written under a `.tmp` name and renamed.
pub async fn run_backup_once<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let now = OffsetDateTime::now_utc();
    let document = snapshot(conn, now).await?;
    let body = serde_json::to_vec_pretty(&document)
        .map_err(|e| AppError::internal(format!("Failed to serialize backup: {e}")))?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| io_error("create backup directory", dir, e))?;

    let target = dir.join(backup_file_name(now)?);
    let tmp = target.with_extension("json.tmp");
    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| io_error("write", &tmp, e))?;
    tokio::fs::rename(&tmp, &target)
        .await
        .map_err(|e| io_error("rename", &tmp, e))?;

    info!(
        path = %target.display(),
        users = document.users.len(),
        grades = document.grades.len(),
        "Backup written"
    );
    Ok(target)
}

/// Run a backup every `config.interval` until `shutdown` fires. The first
/// run happens one full interval after start. Failed runs are logged.
pub fn spawn_backup_job(
    db: DatabaseConnection,
    config: BackupConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            dir = %config.dir.display(),
            interval_secs = config.interval.as_secs(),
            "Backup job started"
        );

        let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = run_backup_once(&db, &config.dir).await {
                        error!(error = %e, "Backup run failed");
                    }
                }
                _ = shutdown.cancelled() => break,
            }
        }

        info!("Backup job stopped");
    })
}
