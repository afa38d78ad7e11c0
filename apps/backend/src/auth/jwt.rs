use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;

use super::claims::{Claims, Identity};
use super::error::TokenError;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Tokens are always minted with this algorithm.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on verification: the HMAC family only.
const ACCEPTED: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Only `alg` is looked at before the library sees the token, so `none`
/// and asymmetric families are told apart from garbage.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Issues and verifies HMAC-signed access tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    issuer: String,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

fn epoch_secs(t: SystemTime) -> Option<i64> {
    t.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&security.jwt_secret),
            decoding: DecodingKey::from_secret(&security.jwt_secret),
            ttl: security.token_ttl,
            issuer: security.issuer.clone(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint a token for `identity` valid from `now` for the configured lifetime.
    pub fn issue(&self, identity: &Identity, now: SystemTime) -> Result<String, AppError> {
        let iat = epoch_secs(now).ok_or_else(|| AppError::internal("clock is before the epoch"))?;
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AppError::internal("token lifetime out of range"))?;

        let claims = Claims {
            user_id: identity.user_id,
            email: identity.email.clone(),
            iss: self.issuer.clone(),
            iat,
            nbf: iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Verify signature and time window at `now`; returns the embedded claims.
    ///
    /// Checks run in this order: shape, algorithm, signature, expiry,
    /// not-before, issuer.
    pub fn verify(&self, token: &str, now: SystemTime) -> Result<Claims, TokenError> {
        let algorithm = header_algorithm(token)?;

        let mut validation = Validation::new(algorithm);
        validation.algorithms = vec![algorithm];
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmMismatch
                }
                _ => TokenError::Malformed,
            })?;

        let now = epoch_secs(now).unwrap_or(0);
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if claims.iss != self.issuer {
            return Err(TokenError::IssuerMismatch);
        }

        Ok(claims)
    }
}

fn header_algorithm(token: &str) -> Result<Algorithm, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    ACCEPTED
        .into_iter()
        .find(|alg| format!("{alg:?}") == header.alg)
        .ok_or(TokenError::AlgorithmMismatch)
}
