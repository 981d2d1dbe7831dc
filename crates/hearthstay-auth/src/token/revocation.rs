//! Revocation endpoint types (RFC 7009).

use serde::Deserialize;

/// Hint about the kind of token being revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTypeHint {
    /// The token is an access token.
    AccessToken,
    /// The token is a refresh token.
    RefreshToken,
}

impl TokenTypeHint {
    /// Parses a wire hint value. Unknown hints are ignored rather than
    /// rejected; the server checks both kinds anyway.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "access_token" => Some(Self::AccessToken),
            "refresh_token" => Some(Self::RefreshToken),
            _ => None,
        }
    }
}

/// Parameters of a revocation request.
#[derive(Debug, Clone, Deserialize)]
pub struct RevocationRequest {
    /// The token to revoke.
    pub token: String,

    /// Optional hint about the token's kind.
    pub token_type_hint: Option<String>,

    /// Client id, when credentials come in the body.
    pub client_id: Option<String>,

    /// Client secret, when credentials come in the body.
    pub client_secret: Option<String>,
}
