use std::fmt;
use std::time::Duration;

use crate::auth::password::{MAX_COST, MIN_COST};
use crate::error::AppError;

pub const MIN_SECRET_BYTES: usize = 32;
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_ISSUER: &str = "accounts";
pub const DEFAULT_HASH_COST: u32 = MIN_COST;

/// Signing and hashing settings. Built once at startup, then only cloned.
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub issuer: String,
    /// bcrypt cost factor
    pub hash_cost: u32,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
            issuer: DEFAULT_ISSUER.to_string(),
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Startup check; a weak secret or out-of-range cost never reaches a request.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::config(format!(
                "JWT secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
                self.jwt_secret.len()
            )));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.hash_cost) {
            return Err(AppError::config(format!(
                "bcrypt cost must be in {MIN_COST}..={MAX_COST}, got {}",
                self.hash_cost
            )));
        }
        if self.token_ttl.is_zero() {
            return Err(AppError::config("token lifetime must be positive"));
        }
        if self.issuer.trim().is_empty() {
            return Err(AppError::config("token issuer must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &format_args!("[{} bytes]", self.jwt_secret.len()))
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
