use std::env;

use crate::error::AppError;

/// Which database the state builder connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// `DATABASE_URL`, or a Postgres URL assembled from `POSTGRES_*`
    Postgres,
    /// Private in-memory SQLite, one per connection pool (tests)
    SqliteMemory,
}

pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// Resolve the connection URL for `kind` from the environment.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::SqliteMemory => Ok(SQLITE_MEMORY_URL.to_string()),
        DbKind::Postgres => {
            if let Some(url) = non_empty_var("DATABASE_URL") {
                return Ok(url);
            }
            let host = non_empty_var("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = non_empty_var("POSTGRES_PORT").unwrap_or_else(|| "5432".to_string());
            let db_name = must_var("POSTGRES_DB")?;
            let username = must_var("POSTGRES_USER")?;
            let password = must_var("POSTGRES_PASSWORD")?;

            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
    }
}

/// Mask the password part of a URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Required environment variable or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    non_empty_var(name)
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "POSTGRES_HOST",
        "POSTGRES_PORT",
        "POSTGRES_DB",
        "POSTGRES_USER",
        "POSTGRES_PASSWORD",
    ];

    fn clear_env() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    #[test]
    #[serial]
    fn database_url_wins() {
        clear_env();
        env::set_var("DATABASE_URL", "postgres://u:p@db:5432/accounts");
        env::set_var("POSTGRES_DB", "ignored");
        assert_eq!(
            db_url(DbKind::Postgres).unwrap(),
            "postgres://u:p@db:5432/accounts"
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn assembled_from_parts_with_defaults() {
        clear_env();
        env::set_var("POSTGRES_DB", "accounts");
        env::set_var("POSTGRES_USER", "app");
        env::set_var("POSTGRES_PASSWORD", "pw");
        assert_eq!(
            db_url(DbKind::Postgres).unwrap(),
            "postgresql://app:pw@localhost:5432/accounts"
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn missing_part_is_config_error() {
        clear_env();
        env::set_var("POSTGRES_DB", "accounts");
        let err = db_url(DbKind::Postgres).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("POSTGRES_USER"));
        clear_env();
    }

    #[test]
    fn sqlite_memory_ignores_env() {
        assert_eq!(db_url(DbKind::SqliteMemory).unwrap(), "sqlite::memory:");
    }

    #[test]
    fn sanitizes_password() {
        assert_eq!(
            sanitize_db_url("postgresql://app:s3cret@db:5432/accounts"),
            "postgresql://app:***@db:5432/accounts"
        );
        assert_eq!(sanitize_db_url("sqlite::memory:"), "sqlite::memory:");
    }
}
