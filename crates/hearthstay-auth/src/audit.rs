//! Security audit logging.
//!
//! Structured tracing events for the security-relevant moments in the
//! token lifecycle. Generic error responses stay deliberately vague on
//! the wire; these events carry the precise internal cause instead.

use tracing::{info, warn};
use uuid::Uuid;

/// Tracing target for audit events, so deployments can route them to a
/// dedicated sink.
pub const AUDIT_TARGET: &str = "hearthstay_auth::audit";

/// An authorization code was issued.
pub fn code_issued(client_id: &str, user_id: Uuid, scope: &str) {
    info!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        user_id = %user_id,
        scope = %scope,
        "authorization code issued"
    );
}

/// An authorization code redemption was refused.
pub fn code_redemption_failed(client_id: &str, cause: &str) {
    warn!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        cause = %cause,
        "authorization code redemption failed"
    );
}

/// A token pair was issued.
pub fn token_issued(client_id: &str, user_id: Uuid, family_id: Uuid, scope: &str) {
    info!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        user_id = %user_id,
        family_id = %family_id,
        scope = %scope,
        "token pair issued"
    );
}

/// A refresh token refresh was refused.
pub fn refresh_failed(client_id: &str, cause: &str) {
    warn!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        cause = %cause,
        "refresh token consumption failed"
    );
}

/// A revoked refresh token was presented again. The whole family was
/// revoked in response.
pub fn refresh_reuse_detected(client_id: &str, family_id: Uuid, revoked: u64) {
    warn!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        family_id = %family_id,
        revoked_pairs = revoked,
        "refresh token reuse detected, family revoked"
    );
}

/// A token was revoked via the revocation endpoint.
pub fn token_revoked(client_id: &str, token_kind: &str) {
    info!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        token_kind = %token_kind,
        "token revoked"
    );
}

/// Client authentication failed.
pub fn client_auth_failed(client_id: &str) {
    warn!(
        target: AUDIT_TARGET,
        client_id = %client_id,
        "client authentication failed"
    );
}
