//! Process configuration, read once at startup.

pub mod db;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::state::security_config::{
    SecurityConfig, DEFAULT_HASH_COST, DEFAULT_ISSUER, DEFAULT_TOKEN_TTL,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Environment variables must be set by the runtime (docker env_file,
    /// `set -a; . ./.env; set +a`, ...). Nothing is read from disk here.
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_var("BACKEND_PORT", DEFAULT_PORT)?;

        let secret = db::must_var("JWT_SECRET")?;
        let ttl_secs = parse_var("JWT_ACCESS_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL.as_secs())?;
        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());
        let cost = parse_var("BCRYPT_COST", DEFAULT_HASH_COST)?;

        let security = SecurityConfig::new(secret.into_bytes())
            .with_token_ttl(Duration::from_secs(ttl_secs))
            .with_issuer(issuer)
            .with_hash_cost(cost);
        security.validate()?;

        Ok(Self {
            host,
            port,
            security,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{name} is invalid ({raw:?}): {e}"))),
        _ => Ok(default),
    }
}
