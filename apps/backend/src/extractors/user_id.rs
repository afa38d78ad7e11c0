use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// User id from the `{id}` path segment. Must be a positive i64.
///
/// Existence is not checked here; the service reports USER_NOT_FOUND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

fn parse_user_id(raw: Option<&str>) -> Result<UserId, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidUserId, "Missing user id parameter")
    })?;

    let user_id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidUserId, format!("Invalid user id: {raw}"))
    })?;

    if user_id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidUserId,
            format!("User id must be positive, got: {user_id}"),
        ));
    }

    Ok(UserId(user_id))
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_user_id(req.match_info().get("id")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_ids() {
        assert_eq!(parse_user_id(Some("1")).unwrap(), UserId(1));
        assert_eq!(
            parse_user_id(Some("9223372036854775807")).unwrap(),
            UserId(i64::MAX)
        );
    }

    #[test]
    fn rejects_everything_else() {
        for raw in [None, Some(""), Some("0"), Some("-3"), Some("abc"), Some("1.5"), Some("99999999999999999999")] {
            let err = parse_user_id(raw).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidUserId, "{raw:?}");
            assert_eq!(err.status().as_u16(), 400);
        }
    }
}
