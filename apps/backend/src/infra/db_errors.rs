//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos convert here (via `From`) and
//! higher layers map `DomainError` to `AppError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const EMAIL_TAKEN: &str = "Email already registered";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// `table.column` from SQLite's "UNIQUE constraint failed: table.column".
fn sqlite_unique_target(msg: &str) -> Option<&str> {
    let (_, rest) = msg.split_once("UNIQUE constraint failed: ")?;
    rest.split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn is_email_unique_violation(msg: &str) -> bool {
    sqlite_unique_target(msg) == Some("users.email")
        || msg.contains("ux_users_email_active")
        || msg.contains("users_email_key")
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");

        if is_email_unique_violation(&msg) {
            return DomainError::conflict(ConflictKind::UniqueEmail, EMAIL_TAKEN);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&msg, "23514") || msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if msg.contains("timeout") || msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unhandled database error");
    DomainError::infra(InfraErrorKind::Other("DbErr".into()), "Database operation failed")
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use crate::errors::domain::ValidationKind;

    use super::*;

    fn exec(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_string()))
    }

    #[test]
    fn sqlite_email_unique() {
        let e = exec("error returned from database: (code: 2067) UNIQUE constraint failed: users.email");
        assert_eq!(
            map_db_err(e),
            DomainError::conflict(ConflictKind::UniqueEmail, EMAIL_TAKEN)
        );
    }

    #[test]
    fn postgres_partial_index_unique() {
        let e = exec(
            "duplicate key value violates unique constraint \"ux_users_email_active\" SQLSTATE(23505)",
        );
        assert!(matches!(
            map_db_err(e),
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[test]
    fn other_unique_is_generic_conflict() {
        let e = exec("UNIQUE constraint failed: widgets.slug");
        assert!(matches!(
            map_db_err(e),
            DomainError::Conflict(ConflictKind::Other(_), _)
        ));
    }

    #[test]
    fn check_constraint_is_validation() {
        let e = exec("CHECK constraint failed: users_email_not_blank");
        assert!(matches!(
            map_db_err(e),
            DomainError::Validation(ValidationKind::Other(_), _)
        ));
    }

    #[test]
    fn record_not_found() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("users".into())),
            DomainError::NotFound(NotFoundKind::Other(_), _)
        ));
    }

    #[test]
    fn connection_failure_is_unavailable() {
        let e = DbErr::Conn(RuntimeErr::Internal("connection refused".into()));
        assert!(matches!(
            map_db_err(e),
            DomainError::Infra(InfraErrorKind::DbUnavailable, _)
        ));
    }

    #[test]
    fn unknown_is_generic_infra() {
        let e = exec("something odd happened");
        assert!(matches!(
            map_db_err(e),
            DomainError::Infra(InfraErrorKind::Other(_), _)
        ));
    }

    #[test]
    fn detail_never_leaks_raw_message() {
        let e = exec("UNIQUE constraint failed: users.email (alice@example.com)");
        let mapped = map_db_err(e);
        assert!(!mapped.to_string().contains("alice@example.com"));
    }
}
