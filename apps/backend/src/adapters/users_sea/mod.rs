//! SeaORM adapter for the users table.
//!
//! Every lookup here ignores soft-deleted rows.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::users;

pub mod dto;

pub use dto::{UserCreate, UserUpdate};

// Adapter functions return DbErr; the repos layer maps to DomainError via From<DbErr>.

pub async fn find_active_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id)
        .filter(users::Column::DeletedAt.is_null())
        .one(conn)
        .await
}

pub async fn find_active_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .filter(users::Column::DeletedAt.is_null())
        .one(conn)
        .await
}

/// Whether a live account other than `except_id` holds `email`.
pub async fn email_in_use<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    except_id: Option<i64>,
) -> Result<bool, sea_orm::DbErr> {
    let mut query = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .filter(users::Column::DeletedAt.is_null());
    if let Some(id) = except_id {
        query = query.filter(users::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    user_active.insert(conn).await
}

/// Apply a partial update to a live row; `RecordNotFound` if there is none.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserUpdate,
) -> Result<users::Model, sea_orm::DbErr> {
    let current = find_active_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("users.id={}", dto.id)))?;

    if dto.is_empty() {
        return Ok(current);
    }

    let mut user_active: users::ActiveModel = current.into();
    if let Some(email) = dto.email {
        user_active.email = Set(email);
    }
    if let Some(password_hash) = dto.password_hash {
        user_active.password_hash = Set(password_hash);
    }
    user_active.updated_at = Set(OffsetDateTime::now_utc());

    user_active.update(conn).await
}

/// Stamp `deleted_at` on a live row. Returns the number of rows touched (0 or 1).
pub async fn soft_delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let result = users::Entity::update_many()
        .col_expr(users::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(users::Column::UpdatedAt, Expr::value(now))
        .filter(users::Column::Id.eq(user_id))
        .filter(users::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
