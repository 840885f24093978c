use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;

use super::access::{course_for_owner, course_for_reader};
use super::{optional_text, require_text};
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::repos::assignments::{self, Assignment, AssignmentCreate, AssignmentUpdate};
use crate::repos::grades;

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub max_points: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub max_points: Option<f64>,
}

fn validate_max_points(max_points: f64) -> Result<f64, AppError> {
    if max_points.is_finite() && max_points > 0.0 {
        Ok(max_points)
    } else {
        Err(AppError::validation("max_points must be greater than zero"))
    }
}

pub async fn list_for_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
    course_id: i64,
) -> Result<Vec<Assignment>, AppError> {
    course_for_reader(conn, caller, course_id).await?;
    Ok(assignments::list_for_courses(conn, &[course_id]).await?)
}

pub async fn get<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
    id: i64,
) -> Result<Assignment, AppError> {
    let assignment = assignments::require_assignment(conn, id).await?;
    course_for_reader(conn, caller, assignment.course_id).await?;
    Ok(assignment)
}

/// The assignment, if `teacher_id` owns its course.
pub async fn for_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
) -> Result<Assignment, AppError> {
    let assignment = assignments::require_assignment(conn, id).await?;
    course_for_owner(conn, teacher_id, assignment.course_id).await?;
    Ok(assignment)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    course_id: i64,
    input: NewAssignment,
) -> Result<Assignment, AppError> {
    course_for_owner(conn, teacher_id, course_id).await?;

    let assignment = assignments::create_assignment(
        conn,
        AssignmentCreate {
            course_id,
            title: require_text("title", &input.title)?,
            description: optional_text(input.description),
            due_date: input.due_date,
            max_points: validate_max_points(input.max_points)?,
        },
    )
    .await?;
    info!(assignment_id = assignment.id, course_id, "Assignment created");
    Ok(assignment)
}

/// Lowering `max_points` below an existing grade is rejected.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
    changes: AssignmentChanges,
) -> Result<Assignment, AppError> {
    for_owner(conn, teacher_id, id).await?;

    let max_points = changes.max_points.map(validate_max_points).transpose()?;
    if let Some(max_points) = max_points {
        let existing = grades::list_for_assignment(conn, id).await?;
        if existing.iter().any(|g| g.points > max_points) {
            return Err(AppError::validation(
                "max_points is below an existing grade for this assignment",
            ));
        }
    }

    let dto = AssignmentUpdate {
        title: changes
            .title
            .as_deref()
            .map(|t| require_text("title", t))
            .transpose()?,
        description: changes.description.map(optional_text),
        due_date: changes.due_date,
        max_points,
    };
    Ok(assignments::update_assignment(conn, id, dto).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
) -> Result<(), AppError> {
    for_owner(conn, teacher_id, id).await?;
    assignments::delete_assignment(conn, id).await?;
    info!(assignment_id = id, teacher_id, "Assignment deleted");
    Ok(())
}
