use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::{CurrentUser, OwnedUserId, ValidatedJson};
use crate::middleware::JwtExtract;
use crate::repos::users::User;
use crate::services::users::UserService;
use crate::state::app_state::AppState;

/// Public view of an account. The digest never leaves the service.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

async fn me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::new()
        .get(&app_state, current_user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

async fn get_user(
    user_id: OwnedUserId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::new().get(&app_state, user_id.0).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

// The owner check runs before the body is read
async fn update_user(
    user_id: OwnedUserId,
    body: ValidatedJson<UpdateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = UserService::new()
        .update(
            &app_state,
            user_id.0,
            body.email.as_deref(),
            body.password.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

async fn delete_user(
    user_id: OwnedUserId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    UserService::new().delete(&app_state, user_id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/me")
            .wrap(JwtExtract)
            .route(web::get().to(me)),
    )
    .service(
        web::resource("/users/{id}")
            .wrap(JwtExtract)
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
