//! OAuth 2.0 client registration types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 2.0 grant types supported by the authorization server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Authorization code grant.
    AuthorizationCode,
    /// Refresh token grant.
    RefreshToken,
}

impl GrantType {
    /// Returns the wire representation of this grant type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered OAuth 2.0 client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    pub client_id: String,

    /// Hashed client secret. `None` for public clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Human-readable client name.
    pub name: String,

    /// Optional client description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Grant types this client is allowed to use.
    pub grant_types: Vec<GrantType>,

    /// Registered redirect URIs. Redemption requires an exact string match.
    pub redirect_uris: Vec<String>,

    /// Scopes this client may request. An empty list allows nothing.
    pub allowed_scopes: Vec<String>,

    /// Whether this is a confidential client (can keep a secret).
    pub confidential: bool,

    /// Whether this client is active. Inactive clients are refused everywhere.
    pub active: bool,

    /// Per-client access token lifetime override in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_lifetime: Option<i64>,

    /// Per-client refresh token lifetime override in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_lifetime: Option<i64>,
}

/// Errors produced by [`Client::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// The client id is empty.
    #[error("client_id must not be empty")]
    EmptyClientId,
    /// The client name is empty.
    #[error("client name must not be empty")]
    EmptyName,
    /// No grant types are registered.
    #[error("at least one grant type must be registered")]
    NoGrantTypes,
    /// A confidential client has no secret.
    #[error("confidential clients must have a client secret")]
    MissingSecret,
    /// The authorization code grant is registered without redirect URIs.
    #[error("authorization_code clients must register at least one redirect URI")]
    NoRedirectUris,
}

impl Client {
    /// Validates the client registration.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }
        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        if self.grant_types.is_empty() {
            return Err(ClientValidationError::NoGrantTypes);
        }
        if self.confidential && self.client_secret.is_none() {
            return Err(ClientValidationError::MissingSecret);
        }
        if self.grant_types.contains(&GrantType::AuthorizationCode)
            && self.redirect_uris.is_empty()
        {
            return Err(ClientValidationError::NoRedirectUris);
        }
        Ok(())
    }

    /// Returns `true` if the given grant type is registered for this client.
    #[must_use]
    pub fn is_grant_type_allowed(&self, grant_type: GrantType) -> bool {
        self.grant_types.contains(&grant_type)
    }

    /// Returns `true` if `uri` exactly matches a registered redirect URI.
    ///
    /// No normalization, wildcard, or prefix matching is performed.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|r| r == uri)
    }

    /// Returns `true` if every scope in `scopes` is in the client's allowed
    /// set. An empty allowed set grants nothing.
    #[must_use]
    pub fn are_scopes_allowed(&self, scopes: &[&str]) -> bool {
        scopes
            .iter()
            .all(|s| self.allowed_scopes.iter().any(|a| a == s))
    }

    /// Effective access token lifetime in seconds given the server default.
    #[must_use]
    pub fn effective_access_lifetime(&self, default_secs: i64) -> i64 {
        self.access_token_lifetime.unwrap_or(default_secs)
    }

    /// Effective refresh token lifetime in seconds given the server default.
    #[must_use]
    pub fn effective_refresh_lifetime(&self, default_secs: i64) -> i64 {
        self.refresh_token_lifetime.unwrap_or(default_secs)
    }
}
