//! Client registration storage trait.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::types::Client;

/// Storage operations for registered OAuth 2.0 clients.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Looks up a client by its client id.
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, AuthError>;

    /// Persists a new client registration.
    ///
    /// Returns `AuthError::InvalidRequest` if a client with the same id
    /// already exists.
    async fn create(&self, client: &Client) -> Result<(), AuthError>;

    /// Replaces an existing client registration.
    async fn update(&self, client: &Client) -> Result<(), AuthError>;

    /// Removes a client registration. Returns `true` if a client was
    /// removed.
    async fn delete(&self, client_id: &str) -> Result<bool, AuthError>;

    /// Lists registered clients, most recently created first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Client>, AuthError>;

    /// Verifies a plaintext secret against the stored hash for the
    /// given client.
    ///
    /// Returns `false` for an unknown client, a public client, or a
    /// mismatched secret; the caller cannot distinguish which.
    async fn verify_secret(&self, client_id: &str, secret: &str) -> Result<bool, AuthError>;
}
