//! SeaORM adapter for courses.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::courses;

pub mod dto;

pub use dto::{CourseCreate, CourseUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<courses::Model>, sea_orm::DbErr> {
    courses::Entity::find_by_id(id).one(conn).await
}

pub async fn list_by_teacher<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
) -> Result<Vec<courses::Model>, sea_orm::DbErr> {
    courses::Entity::find()
        .filter(courses::Column::TeacherId.eq(teacher_id))
        .order_by_asc(courses::Column::Name)
        .all(conn)
        .await
}

pub async fn list_by_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
) -> Result<Vec<courses::Model>, sea_orm::DbErr> {
    courses::Entity::find()
        .filter(courses::Column::ClassId.eq(class_id))
        .order_by_asc(courses::Column::Name)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CourseCreate,
) -> Result<courses::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    courses::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        description: Set(dto.description),
        teacher_id: Set(dto.teacher_id),
        class_id: Set(dto.class_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course: courses::Model,
    dto: CourseUpdate,
) -> Result<courses::Model, sea_orm::DbErr> {
    let mut active = course.into_active_model();
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    if let Some(class_id) = dto.class_id {
        active.class_id = Set(class_id);
    }
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = courses::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
