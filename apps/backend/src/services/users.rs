//! Account lifecycle: register, login, read, update, soft delete.

use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;
use tracing::info;

use crate::adapters::users_sea::UserUpdate;
use crate::auth::error::AuthError;
use crate::auth::password::{check_password, PasswordHasher};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self as users_repo, User};
use crate::state::app_state::AppState;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Trim and lower-case. Stored emails are always in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize, then check shape. Returns the normalized email.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Email is required",
        ));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    check_password(password).map_err(|rule| {
        DomainError::validation(ValidationKind::WeakPassword, rule.to_string())
    })
}

fn email_taken() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
}

/// bcrypt off the async executor.
async fn hash_blocking(hasher: &PasswordHasher, password: &str) -> Result<String, AppError> {
    let hasher = hasher.clone();
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// Verify against `digest`, or against the dummy digest when there is none.
async fn verify_blocking(
    hasher: &PasswordHasher,
    password: &str,
    digest: Option<String>,
) -> Result<bool, AppError> {
    let hasher = hasher.clone();
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || match digest {
        Some(digest) => hasher.verify(&password, &digest),
        None => hasher.verify_dummy(&password),
    })
    .await
    .map_err(|e| AppError::internal(format!("verification task failed: {e}")))
}

/// User domain service.
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// Create an account. The email is normalized before anything else.
    pub async fn register(
        &self,
        state: &AppState,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = validate_email(email)?;
        validate_password(password)?;

        // Cheap pre-check so duplicates don't pay for a hash
        if users_repo::email_in_use(require_db(state)?, &email, None).await? {
            return Err(email_taken().into());
        }

        let password_hash = hash_blocking(&state.passwords, password).await?;

        let user = with_txn(state, |txn| {
            Box::pin(async move {
                // Lookup errors propagate; the unique index covers the race
                if users_repo::email_in_use(txn, &email, None).await? {
                    return Err(AppError::from(email_taken()));
                }
                Ok(users_repo::create_user(txn, &email, &password_hash).await?)
            })
        })
        .await?;

        info!(user_id = user.id, email = %Redacted(&user.email), "User registered");
        Ok(user)
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown email and wrong password fail identically, at the same cost.
    pub async fn login(
        &self,
        state: &AppState,
        email: &str,
        password: &str,
        now: SystemTime,
    ) -> Result<(String, User), AppError> {
        let email = normalize_email(email);
        let user = users_repo::find_user_by_email(require_db(state)?, &email).await?;

        let digest = user.as_ref().map(|u| u.password_hash.clone());
        let matched = verify_blocking(&state.passwords, password, digest).await?;

        let user = match (user, matched) {
            (Some(user), true) => user,
            (None, _) => {
                security::login_failed("unknown_email", &email);
                return Err(AuthError::InvalidCredential(None).into());
            }
            (Some(_), false) => {
                security::login_failed("wrong_password", &email);
                return Err(AuthError::InvalidCredential(None).into());
            }
        };

        let token = state.tokens.issue(&user.identity(), now)?;
        info!(user_id = user.id, email = %Redacted(&user.email), "User logged in");
        Ok((token, user))
    }

    pub async fn get(&self, state: &AppState, user_id: i64) -> Result<User, AppError> {
        Ok(users_repo::require_user(require_db(state)?, user_id).await?)
    }

    /// Partial update. `None` or blank fields leave the column unchanged.
    pub async fn update(
        &self,
        state: &AppState,
        user_id: i64,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, AppError> {
        let email = match email.filter(|e| !e.trim().is_empty()) {
            Some(email) => Some(validate_email(email)?),
            None => None,
        };
        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(password) => {
                validate_password(password)?;
                Some(hash_blocking(&state.passwords, password).await?)
            }
            None => None,
        };

        let email_changed = email.is_some();
        let password_changed = password_hash.is_some();

        let user = with_txn(state, |txn| {
            Box::pin(async move {
                let current: User = users_repo::require_user(txn, user_id)
                    .await
                    .map_err(AppError::from)?;

                let mut update = UserUpdate::new(user_id);
                if let Some(email) = email.filter(|e| *e != current.email) {
                    if users_repo::email_in_use(txn, &email, Some(user_id)).await? {
                        return Err(AppError::from(email_taken()));
                    }
                    update = update.with_email(email);
                }
                if let Some(password_hash) = password_hash {
                    update = update.with_password_hash(password_hash);
                }

                if update.is_empty() {
                    return Ok(current);
                }
                Ok(users_repo::update_user(txn, update).await?)
            })
        })
        .await?;

        info!(
            user_id,
            email = %Redacted(&user.email),
            email_changed,
            password_changed,
            "User updated"
        );
        Ok(user)
    }

    /// Soft delete. The email becomes free for a new registration.
    pub async fn delete(&self, state: &AppState, user_id: i64) -> Result<(), AppError> {
        with_txn(state, |txn| {
            Box::pin(async move {
                users_repo::soft_delete_user(txn, user_id)
                    .await
                    .map_err(AppError::from)
            })
        })
        .await?;

        info!(user_id, "User deleted");
        Ok(())
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::db::DbKind;
    use crate::errors::ErrorCode;
    use crate::infra::state::build_state;
    use crate::state::security_config::SecurityConfig;

    const SECRET: &[u8] = b"service-tests-secret-service-tests";

    async fn state() -> AppState {
        build_state()
            .with_db(DbKind::SqliteMemory)
            .with_security(SecurityConfig::new(SECRET.to_vec()))
            .build()
            .await
            .unwrap()
    }

    #[test]
    fn email_normalization_and_shape() {
        assert_eq!(
            validate_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        for bad in ["", "   ", "alice", "alice@", "@example.com", "alice@example", "a b@example.com"] {
            assert!(
                matches!(
                    validate_email(bad),
                    Err(DomainError::Validation(ValidationKind::InvalidEmail, _))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn register_stores_digest_not_plaintext() {
        let state = state().await;
        let svc = UserService::new();

        let user = svc
            .register(&state, "Alice@Example.com", "password123")
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$2"));
        assert!(state.passwords.verify("password123", &user.password_hash));
    }

    #[tokio::test]
    async fn register_rejects_bad_input_and_duplicates() {
        let state = state().await;
        let svc = UserService::new();

        let err = svc.register(&state, "nope", "password123").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidEmail);

        let err = svc.register(&state, "a@example.com", "short").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::WeakPassword);

        svc.register(&state, "a@example.com", "password123").await.unwrap();
        let err = svc
            .register(&state, " A@EXAMPLE.com", "password456")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmailExists);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = state().await;
        let svc = UserService::new();
        let now = SystemTime::now();
        svc.register(&state, "alice@example.com", "password123").await.unwrap();

        let wrong = svc
            .login(&state, "alice@example.com", "password124", now)
            .await
            .unwrap_err();
        let unknown = svc
            .login(&state, "nobody@example.com", "password123", now)
            .await
            .unwrap_err();

        assert_eq!(wrong.code(), ErrorCode::InvalidCredentials);
        assert_eq!(wrong.code(), unknown.code());
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(wrong.detail(), unknown.detail());
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let state = state().await;
        let svc = UserService::new();
        let now = SystemTime::now();
        let alice = svc.register(&state, "alice@example.com", "password123").await.unwrap();

        let (token, user) = svc
            .login(&state, "ALICE@example.com ", "password123", now)
            .await
            .unwrap();

        assert_eq!(user.id, alice.id);
        let claims = state.tokens.verify(&token, now + Duration::from_secs(1)).unwrap();
        assert_eq!(claims.user_id, alice.id);
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn update_keeps_blank_fields_and_checks_uniqueness() {
        let state = state().await;
        let svc = UserService::new();
        let alice = svc.register(&state, "alice@example.com", "password123").await.unwrap();
        svc.register(&state, "bob@example.com", "password123").await.unwrap();

        let same = svc.update(&state, alice.id, Some("  "), Some("")).await.unwrap();
        assert_eq!(same.email, alice.email);
        assert_eq!(same.password_hash, alice.password_hash);

        let err = svc
            .update(&state, alice.id, Some("Bob@example.com"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmailExists);

        let moved = svc
            .update(&state, alice.id, Some("alice@new.example"), Some("new-password"))
            .await
            .unwrap();
        assert_eq!(moved.email, "alice@new.example");
        svc.login(&state, "alice@new.example", "new-password", SystemTime::now())
            .await
            .unwrap();

        let err = svc.update(&state, 9999, Some("x@example.com"), None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn deleted_user_is_gone_but_email_is_reusable() {
        let state = state().await;
        let svc = UserService::new();
        let alice = svc.register(&state, "alice@example.com", "password123").await.unwrap();

        svc.delete(&state, alice.id).await.unwrap();

        assert_eq!(
            svc.get(&state, alice.id).await.unwrap_err().code(),
            ErrorCode::UserNotFound
        );
        assert_eq!(
            svc.delete(&state, alice.id).await.unwrap_err().code(),
            ErrorCode::UserNotFound
        );
        assert_eq!(
            svc.login(&state, "alice@example.com", "password123", SystemTime::now())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::InvalidCredentials
        );

        let again = svc.register(&state, "alice@example.com", "password123").await.unwrap();
        assert_ne!(again.id, alice.id);
    }
}
