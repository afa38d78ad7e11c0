use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::{Claims, Identity};
use crate::error::AppError;

/// Verified caller identity.
///
/// Read from the `Claims` that `JwtExtract` stored in the request extensions.
/// No database lookup happens here; a deleted account is caught by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Absent claims means the route was not behind the gate or the gate was skipped
        let identity = req
            .extensions()
            .get::<Claims>()
            .map(Claims::identity)
            .ok_or_else(AppError::unauthorized_missing_bearer);

        ready(identity.map(CurrentUser))
    }
}
