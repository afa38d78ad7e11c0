//! Turns an `Authorization` header into verified claims.
//!
//! Pure function of header, codec and clock; `middleware::jwt_extract`
//! wires it into the request pipeline.

use std::time::SystemTime;

use actix_web::http::header::HeaderValue;
use tracing::debug;

use super::claims::Claims;
use super::error::AuthError;
use super::jwt::TokenCodec;

pub const BEARER_SCHEME: &str = "Bearer";

/// Pull the token out of `Bearer <token>`.
///
/// Exactly two single-space separated parts, scheme compared
/// case-insensitively, token non-empty.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthError::MissingCredential),
    }
}

pub fn authenticate(
    header: Option<&HeaderValue>,
    codec: &TokenCodec,
    now: SystemTime,
) -> Result<Claims, AuthError> {
    let token = bearer_token(header)?;
    codec.verify(token, now).map_err(|e| {
        debug!(kind = ?e, "bearer token rejected");
        AuthError::from(e)
    })
}
