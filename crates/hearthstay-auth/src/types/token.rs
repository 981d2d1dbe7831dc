//! Issued token pair types and token material helpers.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

/// Generates a fresh opaque token value: 32 random bytes, base64url
/// without padding.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hashes a token value with SHA-256 for storage. Raw token values are
/// never persisted.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// An access token and its optional refresh token, issued together.
///
/// Rotation links generations through `family_id`: every pair descended
/// from one code redemption shares the family, so detected reuse can
/// revoke the whole lineage at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Unique record identifier.
    pub id: Uuid,

    /// Token family identifier, stable across rotations.
    pub family_id: Uuid,

    /// SHA-256 hash of the access token.
    pub access_token_hash: String,

    /// SHA-256 hash of the refresh token. `None` when no refresh token
    /// was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_hash: Option<String>,

    /// Client the pair was issued to.
    pub client_id: String,

    /// Resource owner the pair represents.
    pub user_id: Uuid,

    /// Space-delimited scope of the pair.
    pub scope: String,

    /// When the pair was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,

    /// When the access token expires.
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,

    /// When the refresh token expires. `None` when no refresh token
    /// was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub refresh_expires_at: Option<OffsetDateTime>,

    /// When the refresh token was consumed by rotation, if it has
    /// been. Consumption does not touch the access half, which stays
    /// valid until its own expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub refresh_consumed_at: Option<OffsetDateTime>,

    /// When the whole pair was revoked, if it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub revoked_at: Option<OffsetDateTime>,

    /// When the access half alone was revoked, if it has been. The
    /// refresh half stays usable in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub access_revoked_at: Option<OffsetDateTime>,
}

impl TokenPair {
    /// Returns `true` if the access token is neither expired nor revoked.
    #[must_use]
    pub fn is_access_active(&self) -> bool {
        self.revoked_at.is_none()
            && self.access_revoked_at.is_none()
            && OffsetDateTime::now_utc() < self.access_expires_at
    }

    /// Returns `true` if the refresh token exists and is neither
    /// expired, consumed, nor revoked.
    #[must_use]
    pub fn is_refresh_active(&self) -> bool {
        if self.revoked_at.is_some() || self.refresh_consumed_at.is_some() {
            return false;
        }
        match (&self.refresh_token_hash, self.refresh_expires_at) {
            (Some(_), Some(expires)) => OffsetDateTime::now_utc() < expires,
            _ => false,
        }
    }

    /// Returns `true` if the refresh token has expired. `false` when no
    /// refresh token was issued.
    #[must_use]
    pub fn is_refresh_expired(&self) -> bool {
        match self.refresh_expires_at {
            Some(expires) => OffsetDateTime::now_utc() >= expires,
            None => false,
        }
    }
}
