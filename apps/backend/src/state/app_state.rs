use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::jwt::TokenCodec;
use crate::auth::password::PasswordHasher;

/// Shared, read-only application state handed to every worker.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Optional so routes that never touch storage can be tested without one
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub tokens: TokenCodec,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self::build(Some(db), security)
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self::build(None, security)
    }

    fn build(db: Option<DatabaseConnection>, security: SecurityConfig) -> Self {
        let tokens = TokenCodec::new(&security);
        let passwords = PasswordHasher::new(security.hash_cost);
        Self {
            db,
            security,
            tokens,
            passwords,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
