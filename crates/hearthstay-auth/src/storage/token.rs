//! Token pair storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthError;
use crate::types::TokenPair;

/// Outcome of an atomic refresh token consumption attempt.
#[derive(Debug, Clone)]
pub enum RefreshConsumption {
    /// The refresh token was active and is now marked consumed so the
    /// caller can mint a successor. The pair's access half stays valid
    /// until its own expiry. The returned record is the pre-consumption
    /// state.
    Consumed(TokenPair),
    /// The refresh token exists but has expired.
    Expired,
    /// The refresh token was already consumed or its pair revoked.
    /// Presenting such a token signals reuse; the carried pair lets the
    /// caller revoke the rest of the family.
    Revoked(TokenPair),
    /// No such refresh token exists.
    NotFound,
}

/// Storage operations for issued token pairs.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Persists a freshly issued token pair.
    async fn create(&self, pair: &TokenPair) -> Result<(), AuthError>;

    /// Looks up a pair by the hash of its access token.
    async fn find_by_access_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError>;

    /// Looks up a pair by the hash of its refresh token.
    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError>;

    /// Atomically consumes a refresh token by its hash.
    ///
    /// At most one caller ever observes `Consumed` for a given hash;
    /// concurrent callers observe `Revoked`.
    async fn consume_refresh(&self, hash: &str) -> Result<RefreshConsumption, AuthError>;

    /// Revokes only the access half of the pair with the given access
    /// token hash. Returns `true` if a pair was found.
    async fn revoke_access(&self, hash: &str) -> Result<bool, AuthError>;

    /// Revokes the whole pair with the given id. Returns `true` if a
    /// pair was found.
    async fn revoke_pair(&self, id: Uuid) -> Result<bool, AuthError>;

    /// Revokes every non-revoked pair in the given family. Returns the
    /// number of pairs newly revoked.
    async fn revoke_family(&self, family_id: Uuid) -> Result<u64, AuthError>;

    /// Removes pairs whose access and refresh lifetimes have both
    /// elapsed. Returns the number removed.
    async fn cleanup_expired(&self) -> Result<u64, AuthError>;

    /// Removes all pairs issued to a client, for use when the client's
    /// registration is deleted. Returns the number removed.
    async fn delete_by_client(&self, client_id: &str) -> Result<u64, AuthError>;
}
