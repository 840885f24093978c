//! SeaORM adapter for grades.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::grades;

pub mod dto;

pub use dto::GradeUpsert;

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
) -> Result<Option<grades::Model>, sea_orm::DbErr> {
    grades::Entity::find()
        .filter(grades::Column::AssignmentId.eq(assignment_id))
        .filter(grades::Column::StudentId.eq(student_id))
        .one(conn)
        .await
}

pub async fn list_by_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_id: i64,
) -> Result<Vec<grades::Model>, sea_orm::DbErr> {
    grades::Entity::find()
        .filter(grades::Column::AssignmentId.eq(assignment_id))
        .order_by_asc(grades::Column::StudentId)
        .all(conn)
        .await
}

pub async fn list_by_assignments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_ids: &[i64],
) -> Result<Vec<grades::Model>, sea_orm::DbErr> {
    if assignment_ids.is_empty() {
        return Ok(Vec::new());
    }
    grades::Entity::find()
        .filter(grades::Column::AssignmentId.is_in(assignment_ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn list_by_student<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    student_id: i64,
) -> Result<Vec<grades::Model>, sea_orm::DbErr> {
    grades::Entity::find()
        .filter(grades::Column::StudentId.eq(student_id))
        .order_by_asc(grades::Column::AssignmentId)
        .all(conn)
        .await
}

/// Insert, or overwrite points/comment of the existing grade. Call inside a
/// transaction; the unique index catches concurrent inserts.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GradeUpsert,
) -> Result<grades::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    match find(conn, dto.assignment_id, dto.student_id).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.points = Set(dto.points);
            active.comment = Set(dto.comment);
            active.graded_at = Set(now);
            active.update(conn).await
        }
        None => {
            grades::ActiveModel {
                id: NotSet,
                assignment_id: Set(dto.assignment_id),
                student_id: Set(dto.student_id),
                points: Set(dto.points),
                comment: Set(dto.comment),
                graded_at: Set(now),
            }
            .insert(conn)
            .await
        }
    }
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = grades::Entity::delete_many()
        .filter(grades::Column::AssignmentId.eq(assignment_id))
        .filter(grades::Column::StudentId.eq(student_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
