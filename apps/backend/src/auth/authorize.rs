use super::claims::Identity;
use super::error::AuthError;
use crate::logging::security;

/// Callers may only act on their own account.
pub fn ensure_owner(identity: &Identity, owner_id: i64) -> Result<(), AuthError> {
    if identity.user_id == owner_id {
        return Ok(());
    }
    security::access_denied(identity.user_id, owner_id);
    Err(AuthError::Forbidden)
}
