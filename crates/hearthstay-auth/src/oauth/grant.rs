//! Token endpoint request and response types.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Raw form parameters of a token endpoint request.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// The requested grant type.
    pub grant_type: String,

    /// Authorization code, for the code grant.
    pub code: Option<String>,

    /// Redirect URI used at authorization time, for the code grant.
    pub redirect_uri: Option<String>,

    /// Refresh token, for the refresh grant.
    pub refresh_token: Option<String>,

    /// Requested scope, for refresh narrowing.
    pub scope: Option<String>,

    /// Client id, when credentials come in the body.
    pub client_id: Option<String>,

    /// Client secret, when credentials come in the body.
    pub client_secret: Option<String>,
}

/// A parsed, structurally valid token grant request.
///
/// Parsing happens before any store access, so malformed requests never
/// touch storage.
#[derive(Debug, Clone)]
pub enum GrantRequest {
    /// Authorization code exchange.
    AuthorizationCode {
        /// The code to redeem.
        code: String,
        /// The redirect URI bound at authorization time, when sent.
        redirect_uri: Option<String>,
    },
    /// Refresh token rotation.
    RefreshToken {
        /// The refresh token to consume.
        refresh_token: String,
        /// Requested scope, which may only narrow the original grant.
        scope: Option<String>,
    },
}

impl GrantRequest {
    /// Parses a raw token request into a structured grant request.
    ///
    /// An unrecognized `grant_type` is rejected before the per-grant
    /// parameters are examined.
    pub fn parse(request: &TokenRequest) -> Result<Self, AuthError> {
        match request.grant_type.as_str() {
            "authorization_code" => {
                let code = request
                    .code
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        AuthError::invalid_request("code is required for authorization_code")
                    })?;
                Ok(Self::AuthorizationCode {
                    code: code.to_string(),
                    redirect_uri: request.redirect_uri.clone(),
                })
            }
            "refresh_token" => {
                let token = request
                    .refresh_token
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        AuthError::invalid_request("refresh_token is required for refresh_token")
                    })?;
                Ok(Self::RefreshToken {
                    refresh_token: token.to_string(),
                    scope: request.scope.clone(),
                })
            }
            other => Err(AuthError::unsupported_grant_type(other)),
        }
    }
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,

    /// The issued refresh token, when the client may refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Always `bearer`.
    pub token_type: String,

    /// Access token lifetime in seconds.
    pub expires_in: i64,

    /// The granted scope.
    pub scope: String,
}

impl TokenResponse {
    /// Builds a bearer token response.
    #[must_use]
    pub fn bearer(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: String,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(grant_type: &str) -> TokenRequest {
        TokenRequest {
            grant_type: grant_type.to_string(),
            code: None,
            redirect_uri: None,
            refresh_token: None,
            scope: None,
            client_id: None,
            client_secret: None,
        }
    }

    #[test]
    fn test_parse_authorization_code() {
        let mut request = raw("authorization_code");
        request.code = Some("abc".to_string());
        request.redirect_uri = Some("https://app.example.com/cb".to_string());

        match GrantRequest::parse(&request).unwrap() {
            GrantRequest::AuthorizationCode { code, redirect_uri } => {
                assert_eq!(code, "abc");
                assert_eq!(redirect_uri.as_deref(), Some("https://app.example.com/cb"));
            }
            other => panic!("unexpected grant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_code_grant_missing_code() {
        let request = raw("authorization_code");
        let err = GrantRequest::parse(&request).unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[test]
    fn test_parse_refresh_token() {
        let mut request = raw("refresh_token");
        request.refresh_token = Some("rt".to_string());
        request.scope = Some("read".to_string());

        match GrantRequest::parse(&request).unwrap() {
            GrantRequest::RefreshToken {
                refresh_token,
                scope,
            } => {
                assert_eq!(refresh_token, "rt");
                assert_eq!(scope.as_deref(), Some("read"));
            }
            other => panic!("unexpected grant: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_grant_type_rejected_first() {
        // No parameters at all, but the grant type error wins.
        let request = raw("client_credentials");
        let err = GrantRequest::parse(&request).unwrap_err();
        assert!(matches!(
            err,
            AuthError::UnsupportedGrantType { ref grant_type } if grant_type == "client_credentials"
        ));
    }

    #[test]
    fn test_token_response_serialization() {
        let response = TokenResponse::bearer("at".to_string(), None, 3600, "read".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 3600);
        assert!(json.get("refresh_token").is_none());
    }
}
