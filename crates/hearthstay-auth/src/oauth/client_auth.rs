//! Client authentication for the token, revocation, and introspection
//! endpoints.
//!
//! Supports HTTP Basic credentials and body parameters. All failures
//! collapse to the same `invalid_client` error so a caller cannot probe
//! which half of the credentials was wrong.

use std::sync::Arc;

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::audit;
use crate::error::AuthError;
use crate::storage::ClientStorage;
use crate::types::Client;

/// A client that has passed authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    /// The authenticated client record.
    pub client: Client,
}

/// Extracts client credentials from an HTTP Basic `Authorization`
/// header, if one is present and well-formed.
#[must_use]
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Authenticates a client by id and optional secret.
///
/// Confidential clients must present the correct secret. Public clients
/// authenticate by id alone. Unknown id, inactive client, and wrong
/// secret all produce the same error.
pub async fn authenticate_client(
    storage: &Arc<dyn ClientStorage>,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<AuthenticatedClient, AuthError> {
    let refused = || AuthError::invalid_client("client authentication failed");

    let Some(client) = storage.find_by_client_id(client_id).await? else {
        audit::client_auth_failed(client_id);
        return Err(refused());
    };

    if !client.active {
        audit::client_auth_failed(client_id);
        return Err(refused());
    }

    if client.confidential {
        let Some(secret) = client_secret else {
            audit::client_auth_failed(client_id);
            return Err(refused());
        };
        if !storage.verify_secret(client_id, secret).await? {
            audit::client_auth_failed(client_id);
            return Err(refused());
        }
    }

    Ok(AuthenticatedClient { client })
}
