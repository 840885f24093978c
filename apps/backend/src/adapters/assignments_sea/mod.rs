//! SeaORM adapter for assignments.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::assignments;

pub mod dto;

pub use dto::{AssignmentCreate, AssignmentUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<assignments::Model>, sea_orm::DbErr> {
    assignments::Entity::find_by_id(id).one(conn).await
}

/// Assignments of the given courses, ordered by course then id.
pub async fn list_by_courses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    course_ids: &[i64],
) -> Result<Vec<assignments::Model>, sea_orm::DbErr> {
    if course_ids.is_empty() {
        return Ok(Vec::new());
    }
    assignments::Entity::find()
        .filter(assignments::Column::CourseId.is_in(course_ids.iter().copied()))
        .order_by_asc(assignments::Column::CourseId)
        .order_by_asc(assignments::Column::Id)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AssignmentCreate,
) -> Result<assignments::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    assignments::ActiveModel {
        id: NotSet,
        course_id: Set(dto.course_id),
        title: Set(dto.title),
        description: Set(dto.description),
        due_date: Set(dto.due_date),
        max_points: Set(dto.max_points),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment: assignments::Model,
    dto: AssignmentUpdate,
) -> Result<assignments::Model, sea_orm::DbErr> {
    let mut active = assignment.into_active_model();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    if let Some(due_date) = dto.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(max_points) = dto.max_points {
        active.max_points = Set(max_points);
    }
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = assignments::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
