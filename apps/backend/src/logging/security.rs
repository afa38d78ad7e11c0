//! Security events, one `event` field per kind so they can be filtered.

use tracing::warn;

use crate::auth::error::AuthError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Login rejected. `reason` stays server-side; clients only see INVALID_CREDENTIALS.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// Bearer token refused by the gate.
pub fn token_rejected(err: &AuthError, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        kind = ?err.kind(),
        detail = %err,
        path,
        "Bearer authentication failed"
    );
}

/// Authenticated caller tried to act on someone else's account.
pub fn access_denied(user_id: i64, owner_id: i64) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        user_id,
        owner_id,
        "Caller does not own the resource"
    );
}
