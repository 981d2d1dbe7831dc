//! Authorization endpoint request and response types.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;

fn default_scope() -> String {
    String::new()
}

/// Parameters of an authorization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Requested response type. Only `code` is supported.
    pub response_type: String,

    /// The requesting client's id.
    pub client_id: String,

    /// Where to deliver the code. Must exactly match a registered URI.
    pub redirect_uri: String,

    /// Space-delimited requested scope.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Opaque client state, echoed back unchanged on the redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationRequest {
    /// Splits the scope parameter into individual scope values.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scope.split_whitespace().collect()
    }
}

/// A granted authorization, ready to be delivered by redirect.
#[derive(Debug, Clone)]
pub struct AuthorizationGrant {
    /// The issued authorization code.
    pub code: String,

    /// The client state to echo back, if one was sent.
    pub state: Option<String>,

    /// The validated redirect URI.
    pub redirect_uri: String,
}

impl AuthorizationGrant {
    /// Builds the redirect URL carrying the code and echoed state.
    pub fn to_redirect_url(&self) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.redirect_uri)
            .map_err(|e| AuthError::invalid_redirect(format!("malformed redirect URI: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("code", &self.code);
            if let Some(state) = &self.state {
                query.append_pair("state", state);
            }
        }
        Ok(url)
    }
}
