//! Class repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::classes_sea as classes_adapter;
use crate::entities::classes;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use classes_adapter::{ClassCreate, ClassUpdate};

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub school_year: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<classes::Model> for Class {
    fn from(model: classes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            school_year: model.school_year,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Class, format!("Class {id} not found"))
}

pub async fn require_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Class, DomainError> {
    classes_adapter::find_by_id(conn, id)
        .await?
        .map(Class::from)
        .ok_or_else(|| not_found(id))
}

pub async fn list_classes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Class>, DomainError> {
    let models = classes_adapter::list(conn).await?;
    Ok(models.into_iter().map(Class::from).collect())
}

pub async fn create_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ClassCreate,
) -> Result<Class, DomainError> {
    Ok(Class::from(classes_adapter::create(conn, dto).await?))
}

pub async fn update_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: ClassUpdate,
) -> Result<Class, DomainError> {
    let model = classes_adapter::find_by_id(conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Class::from(classes_adapter::update(conn, model, dto).await?))
}

pub async fn delete_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), DomainError> {
    match classes_adapter::delete(conn, id).await? {
        0 => Err(not_found(id)),
        _ => Ok(()),
    }
}
