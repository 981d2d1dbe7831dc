//! Authorization code storage trait.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::types::AuthorizationCode;

/// Outcome of an atomic code redemption attempt.
#[derive(Debug, Clone)]
pub enum CodeRedemption {
    /// The code was valid and is now marked redeemed. The returned
    /// record is the pre-redemption state.
    Redeemed(AuthorizationCode),
    /// The code exists but has expired.
    Expired,
    /// The code was already redeemed by an earlier call.
    AlreadyRedeemed,
    /// No such code exists.
    NotFound,
}

/// Storage operations for authorization codes.
#[async_trait]
pub trait CodeStorage: Send + Sync {
    /// Persists a freshly issued authorization code.
    async fn create(&self, code: &AuthorizationCode) -> Result<(), AuthError>;

    /// Looks up a code record by its code value without consuming it.
    async fn find_by_code(&self, code: &str) -> Result<Option<AuthorizationCode>, AuthError>;

    /// Atomically redeems a code.
    ///
    /// At most one caller ever observes `Redeemed` for a given code
    /// value; concurrent callers observe `AlreadyRedeemed`.
    async fn redeem_once(&self, code: &str) -> Result<CodeRedemption, AuthError>;

    /// Removes expired code records. Returns the number removed.
    async fn cleanup_expired(&self) -> Result<u64, AuthError>;

    /// Removes all codes issued to a client. Returns the number removed.
    async fn delete_by_client(&self, client_id: &str) -> Result<u64, AuthError>;
}
