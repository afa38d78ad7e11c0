use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use super::{CurrentUser, UserId};
use crate::auth::ensure_owner;
use crate::error::AppError;

/// `{id}` path segment that the caller owns.
///
/// Resolves the caller and the path id, then applies the ownership rule.
/// Declare it before any body extractor so a non-owner is refused with 403
/// without the body being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedUserId(pub i64);

fn resolve(req: &HttpRequest) -> Result<OwnedUserId, AppError> {
    let current_user = CurrentUser::extract(req).into_inner()?;
    let UserId(user_id) = UserId::extract(req).into_inner()?;
    ensure_owner(&current_user, user_id)?;
    Ok(OwnedUserId(user_id))
}

impl FromRequest for OwnedUserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
