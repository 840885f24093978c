//! Assignment repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::assignments_sea as assignments_adapter;
use crate::entities::assignments;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use assignments_adapter::{AssignmentCreate, AssignmentUpdate};

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub max_points: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<assignments::Model> for Assignment {
    fn from(model: assignments::Model) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            max_points: model.max_points,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Assignment, format!("Assignment {id} not found"))
}

pub async fn require_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Assignment, DomainError> {
    assignments_adapter::find_by_id(conn, id)
        .await?
        .map(Assignment::from)
        .ok_or_else(|| not_found(id))
}

pub async fn list_for_courses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_ids: &[i64],
) -> Result<Vec<Assignment>, DomainError> {
    let models = assignments_adapter::list_by_courses(conn, course_ids).await?;
    Ok(models.into_iter().map(Assignment::from).collect())
}

pub async fn create_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AssignmentCreate,
) -> Result<Assignment, DomainError> {
    Ok(Assignment::from(assignments_adapter::create(conn, dto).await?))
}

pub async fn update_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: AssignmentUpdate,
) -> Result<Assignment, DomainError> {
    let model = assignments_adapter::find_by_id(conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Assignment::from(
        assignments_adapter::update(conn, model, dto).await?,
    ))
}

pub async fn delete_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    match assignments_adapter::delete(conn, id).await? {
        0 => Err(not_found(id)),
        _ => Ok(()),
    }
}
