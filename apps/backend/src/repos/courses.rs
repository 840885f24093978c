//! Course repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::courses_sea as courses_adapter;
use crate::entities::courses;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use courses_adapter::{CourseCreate, CourseUpdate};

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub class_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<courses::Model> for Course {
    fn from(model: courses::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            teacher_id: model.teacher_id,
            class_id: model.class_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Course, format!("Course {id} not found"))
}

pub async fn require_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Course, DomainError> {
    courses_adapter::find_by_id(conn, id)
        .await?
        .map(Course::from)
        .ok_or_else(|| not_found(id))
}

pub async fn list_for_teacher<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
) -> Result<Vec<Course>, DomainError> {
    let models = courses_adapter::list_by_teacher(conn, teacher_id).await?;
    Ok(models.into_iter().map(Course::from).collect())
}

pub async fn list_for_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
) -> Result<Vec<Course>, DomainError> {
    let models = courses_adapter::list_by_class(conn, class_id).await?;
    Ok(models.into_iter().map(Course::from).collect())
}

pub async fn create_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CourseCreate,
) -> Result<Course, DomainError> {
    Ok(Course::from(courses_adapter::create(conn, dto).await?))
}

pub async fn update_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: CourseUpdate,
) -> Result<Course, DomainError> {
    let model = courses_adapter::find_by_id(conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Course::from(courses_adapter::update(conn, model, dto).await?))
}

pub async fn delete_course<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    match courses_adapter::delete(conn, id).await? {
        0 => Err(not_found(id)),
        _ => Ok(()),
    }
}
