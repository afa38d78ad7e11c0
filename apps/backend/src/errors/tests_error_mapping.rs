// DomainError -> AppError mapping; no HTTP server or database involved.
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds_to_400() {
    let email = DomainError::validation(ValidationKind::InvalidEmail, "bad email");
    let app: AppError = email.into();
    assert_eq!(app.code(), ErrorCode::InvalidEmail);
    assert_eq!(app.status().as_u16(), 400);

    let weak = DomainError::validation(ValidationKind::WeakPassword, "too short");
    let app: AppError = weak.into();
    assert_eq!(app.code(), ErrorCode::WeakPassword);
    assert_eq!(app.status().as_u16(), 400);

    let other = DomainError::validation_other("something else");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::UniqueEmail, "email exists");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "EMAIL_EXISTS");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("Unique".into()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::User, "no user");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "USER_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let rec = DomainError::not_found(NotFoundKind::Other("Record".into()), "gone");
    let app: AppError = rec.into();
    assert_eq!(app.code().as_str(), "NOT_FOUND");
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let other = DomainError::infra(InfraErrorKind::Other("DbErr".into()), "boom");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn every_401_carries_a_bearer_challenge() {
    use actix_web::http::header::WWW_AUTHENTICATE;
    use actix_web::ResponseError;

    for err in [
        AppError::unauthorized_missing_bearer(),
        AppError::unauthorized_invalid_jwt(),
        AppError::unauthorized_expired_jwt(),
        AppError::invalid_credentials(),
    ] {
        let resp = err.error_response();
        assert_eq!(resp.status().as_u16(), 401);
        let challenge = resp
            .headers()
            .get(WWW_AUTHENTICATE)
            .unwrap_or_else(|| panic!("{} without WWW-Authenticate", err.code()))
            .to_str()
            .unwrap();
        assert!(challenge.starts_with("Bearer"), "{challenge}");
    }
}
