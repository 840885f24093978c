//! Grade repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::grades_sea as grades_adapter;
use crate::entities::grades;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use grades_adapter::GradeUpsert;

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub points: f64,
    pub comment: Option<String>,
    pub graded_at: OffsetDateTime,
}

impl From<grades::Model> for Grade {
    fn from(model: grades::Model) -> Self {
        Self {
            id: model.id,
            assignment_id: model.assignment_id,
            student_id: model.student_id,
            points: model.points,
            comment: model.comment,
            graded_at: model.graded_at,
        }
    }
}

fn convert_all(models: Vec<grades::Model>) -> Vec<Grade> {
    models.into_iter().map(Grade::from).collect()
}

pub async fn list_for_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_id: i64,
) -> Result<Vec<Grade>, DomainError> {
    Ok(convert_all(
        grades_adapter::list_by_assignment(conn, assignment_id).await?,
    ))
}

pub async fn list_for_assignments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_ids: &[i64],
) -> Result<Vec<Grade>, DomainError> {
    Ok(convert_all(
        grades_adapter::list_by_assignments(conn, assignment_ids).await?,
    ))
}

pub async fn list_for_student<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    student_id: i64,
) -> Result<Vec<Grade>, DomainError> {
    Ok(convert_all(
        grades_adapter::list_by_student(conn, student_id).await?,
    ))
}

pub async fn upsert_grade<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GradeUpsert,
) -> Result<Grade, DomainError> {
    Ok(Grade::from(grades_adapter::upsert(conn, dto).await?))
}

pub async fn delete_grade<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
) -> Result<(), DomainError> {
    match grades_adapter::delete(conn, assignment_id, student_id).await? {
        0 => Err(DomainError::not_found(
            NotFoundKind::Grade,
            format!("No grade for student {student_id} on assignment {assignment_id}"),
        )),
        _ => Ok(()),
    }
}
