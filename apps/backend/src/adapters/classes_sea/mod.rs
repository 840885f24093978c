//! SeaORM adapter for classes.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet, QueryOrder, Set,
};

use crate::entities::classes;

pub mod dto;

pub use dto::{ClassCreate, ClassUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<classes::Model>, sea_orm::DbErr> {
    classes::Entity::find_by_id(id).one(conn).await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<classes::Model>, sea_orm::DbErr> {
    classes::Entity::find()
        .order_by_asc(classes::Column::Name)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ClassCreate,
) -> Result<classes::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    classes::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        school_year: Set(dto.school_year),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class: classes::Model,
    dto: ClassUpdate,
) -> Result<classes::Model, sea_orm::DbErr> {
    let mut active = class.into_active_model();
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(school_year) = dto.school_year {
        active.school_year = Set(school_year);
    }
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = classes::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
