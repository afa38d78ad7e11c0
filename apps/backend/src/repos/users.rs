//! User repository functions for the domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea::{self as users_adapter, UserCreate, UserUpdate};
use crate::auth::claims::Identity;
use crate::errors::domain::{DomainError, NotFoundKind};

/// User domain model. Only live (not soft-deleted) rows become a `User`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
        }
    }
}

fn user_not_found(user_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_active_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, DomainError> {
    find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_active_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn email_in_use<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    except_id: Option<i64>,
) -> Result<bool, DomainError> {
    Ok(users_adapter::email_in_use(conn, email, except_id).await?)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password_hash: &str,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, UserCreate::new(email, password_hash)).await?;
    Ok(User::from(user))
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    update: UserUpdate,
) -> Result<User, DomainError> {
    let user_id = update.id;
    match users_adapter::update_user(conn, update).await {
        Ok(user) => Ok(User::from(user)),
        Err(sea_orm::DbErr::RecordNotFound(_)) => Err(user_not_found(user_id)),
        Err(e) => Err(e.into()),
    }
}

pub async fn soft_delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    match users_adapter::soft_delete_user(conn, user_id).await? {
        0 => Err(user_not_found(user_id)),
        _ => Ok(()),
    }
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
