//! SeaORM adapter for users.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::users;

pub mod dto;

pub use dto::UserCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(conn)
        .await
}

/// All users, optionally restricted to one role, ordered by id.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    role: Option<&str>,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    let mut query = users::Entity::find();
    if let Some(role) = role {
        query = query.filter(users::Column::Role.eq(role));
    }
    query.order_by_asc(users::Column::Id).all(conn).await
}

pub async fn list_by_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
    role: &str,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::ClassId.eq(class_id))
        .filter(users::Column::Role.eq(role))
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    users::ActiveModel {
        id: NotSet,
        username: Set(dto.username),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        role: Set(dto.role),
        first_name: Set(dto.first_name),
        last_name: Set(dto.last_name),
        class_id: Set(dto.class_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn set_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    class_id: Option<i64>,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active = user.into_active_model();
    active.class_id = Set(class_id);
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}

/// Returns the number of rows removed.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = users::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
