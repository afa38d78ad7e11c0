//! bcrypt credential hashing.
//!
//! bcrypt is CPU-bound; callers on the async executor go through
//! `tokio::task::spawn_blocking` (see `services::users`).

use std::sync::{Arc, OnceLock};

use tracing::warn;

use super::error::{AuthError, PasswordRule};

pub const MIN_PASSWORD_BYTES: usize = 8;
/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;
pub const MIN_COST: u32 = 12;
pub const MAX_COST: u32 = 31;

/// Plaintext run through the dummy digest on unknown-email logins.
const DUMMY_PLAINTEXT: &str = "not-a-real-password-timing-only";

/// Check the byte-length window accepted by [`PasswordHasher::hash`].
pub fn check_password(plaintext: &str) -> Result<(), PasswordRule> {
    match plaintext.len() {
        0 => Err(PasswordRule::Empty),
        n if n < MIN_PASSWORD_BYTES => Err(PasswordRule::TooShort),
        n if n > MAX_PASSWORD_BYTES => Err(PasswordRule::TooLong),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy: Arc<OnceLock<String>>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Cost is clamped into `MIN_COST..=MAX_COST`.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
            dummy: Arc::new(OnceLock::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        check_password(plaintext).map_err(AuthError::WeakInput)?;
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Never errors: a malformed or foreign digest simply does not match.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "stored digest could not be parsed");
                false
            }
        }
    }

    /// Burn one verification at full cost; always false.
    ///
    /// Used when the email is unknown so both login failures take the same time.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let digest = self.dummy.get_or_init(|| {
            bcrypt::hash(DUMMY_PLAINTEXT, self.cost).unwrap_or_else(|e| {
                warn!(error = %e, "dummy digest generation failed");
                String::new()
            })
        });
        let _ = bcrypt::verify(plaintext, digest);
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(MIN_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_window() {
        assert_eq!(check_password(""), Err(PasswordRule::Empty));
        assert_eq!(check_password("1234567"), Err(PasswordRule::TooShort));
        assert_eq!(check_password("12345678"), Ok(()));
        assert_eq!(check_password(&"x".repeat(72)), Ok(()));
        assert_eq!(check_password(&"x".repeat(73)), Err(PasswordRule::TooLong));
    }

    #[test]
    fn length_counts_bytes_not_chars() {
        // 4 chars, 8 bytes
        assert_eq!(check_password("éééé"), Ok(()));
        // 37 chars, 74 bytes
        assert_eq!(check_password(&"é".repeat(37)), Err(PasswordRule::TooLong));
    }

    #[test]
    fn cost_never_below_minimum() {
        assert_eq!(PasswordHasher::new(4).cost(), MIN_COST);
        assert_eq!(PasswordHasher::new(13).cost(), 13);
        assert_eq!(PasswordHasher::new(99).cost(), MAX_COST);
    }

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::default();
        let digest = hasher.hash("password123").unwrap();

        assert_ne!(digest, "password123");
        assert!(digest.starts_with("$2b$12$"));
        assert!(hasher.verify("password123", &digest));
        assert!(!hasher.verify("password124", &digest));
        assert!(!hasher.verify("", &digest));
    }

    #[test]
    fn salts_differ_per_digest() {
        let hasher = PasswordHasher::default();
        let a = hasher.hash("password123").unwrap();
        let b = hasher.hash("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn weak_input_rejected_before_hashing() {
        let hasher = PasswordHasher::default();
        assert_eq!(
            hasher.hash("short"),
            Err(AuthError::WeakInput(PasswordRule::TooShort))
        );
        assert_eq!(
            hasher.hash(""),
            Err(AuthError::WeakInput(PasswordRule::Empty))
        );
    }

    #[test]
    fn malformed_digest_is_false_not_error() {
        let hasher = PasswordHasher::default();
        assert!(!hasher.verify("password123", "not-a-digest"));
        assert!(!hasher.verify("password123", "$argon2id$v=19$m=65536,t=3,p=4$abc$def"));
        assert!(!hasher.verify("password123", ""));
    }

    #[test]
    fn dummy_never_matches() {
        let hasher = PasswordHasher::default();
        assert!(!hasher.verify_dummy(DUMMY_PLAINTEXT));
        assert!(!hasher.verify_dummy("password123"));
    }
}
