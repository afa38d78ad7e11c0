//! Failure kinds of the authentication core.

use std::fmt;

use thiserror::Error;

use crate::error::AppError;

/// Why a token failed verification. Kept internal; every kind except
/// `Expired` reaches the client as `UNAUTHORIZED_INVALID_JWT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token algorithm is not in the HMAC family")]
    AlgorithmMismatch,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token issuer does not match")]
    IssuerMismatch,
}

/// Which password shape rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Empty,
    TooShort,
    TooLong,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::auth::password::{MAX_PASSWORD_BYTES, MIN_PASSWORD_BYTES};

        match self {
            PasswordRule::Empty => f.write_str("password is required"),
            PasswordRule::TooShort => {
                write!(f, "password must be at least {MIN_PASSWORD_BYTES} bytes")
            }
            PasswordRule::TooLong => {
                write!(f, "password must be at most {MAX_PASSWORD_BYTES} bytes")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("weak password: {0}")]
    WeakInput(PasswordRule),
    #[error("missing bearer credential")]
    MissingCredential,
    /// `Some` for a rejected token, `None` for a rejected email/password pair.
    #[error("invalid credential")]
    InvalidCredential(Option<TokenError>),
    #[error("token expired")]
    ExpiredToken,
    #[error("forbidden")]
    Forbidden,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Fieldless view of [`AuthError`] for matching by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    WeakInput,
    MissingCredential,
    InvalidCredential,
    ExpiredToken,
    Forbidden,
    Hashing,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::WeakInput(_) => AuthErrorKind::WeakInput,
            AuthError::MissingCredential => AuthErrorKind::MissingCredential,
            AuthError::InvalidCredential(_) => AuthErrorKind::InvalidCredential,
            AuthError::ExpiredToken => AuthErrorKind::ExpiredToken,
            AuthError::Forbidden => AuthErrorKind::Forbidden,
            AuthError::Hashing(_) => AuthErrorKind::Hashing,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::ExpiredToken,
            other => AuthError::InvalidCredential(Some(other)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        use crate::errors::ErrorCode;

        match e {
            AuthError::WeakInput(rule) => AppError::invalid(ErrorCode::WeakPassword, rule.to_string()),
            AuthError::MissingCredential => AppError::unauthorized_missing_bearer(),
            AuthError::InvalidCredential(Some(_)) => AppError::unauthorized_invalid_jwt(),
            AuthError::InvalidCredential(None) => AppError::invalid_credentials(),
            AuthError::ExpiredToken => AppError::unauthorized_expired_jwt(),
            AuthError::Forbidden => AppError::forbidden(),
            AuthError::Hashing(detail) => AppError::internal(detail),
        }
    }
}
