//! Authorization code types.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single-use authorization code binding a client, user, scope, and
/// redirect URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Unique record identifier.
    pub id: Uuid,

    /// The opaque code value handed to the client.
    pub code: String,

    /// Client the code was issued to.
    pub client_id: String,

    /// Resource owner the code represents.
    pub user_id: Uuid,

    /// Space-delimited scope granted with the code.
    pub scope: String,

    /// The redirect URI the code was issued for. Redemption must present
    /// the same URI when one was bound at issuance.
    pub redirect_uri: String,

    /// When the code was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,

    /// When the code expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// When the code was redeemed, if it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub redeemed_at: Option<OffsetDateTime>,
}

impl AuthorizationCode {
    /// Generates a fresh opaque code value: 32 random bytes, base64url
    /// without padding.
    #[must_use]
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the code has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() >= self.expires_at
    }

    /// Returns `true` if the code has already been redeemed.
    #[must_use]
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }
}
