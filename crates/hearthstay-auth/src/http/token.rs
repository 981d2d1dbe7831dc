//! Token endpoint handler.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::http::error_response;
use crate::oauth::{authenticate_client, parse_basic_auth, GrantRequest, TokenRequest};
use crate::storage::ClientStorage;
use crate::token::TokenService;

/// Shared state for the token endpoint.
#[derive(Clone)]
pub struct TokenState {
    /// The token service.
    pub service: Arc<TokenService>,
    /// Client registrations, for authenticating callers.
    pub clients: Arc<dyn ClientStorage>,
}

/// Extracts client credentials from the Basic header or body params.
/// Basic credentials win when both are present.
pub(crate) fn extract_client_credentials(
    headers: &HeaderMap,
    body_id: Option<&str>,
    body_secret: Option<&str>,
) -> Result<(String, Option<String>), AuthError> {
    if let Some((id, secret)) = parse_basic_auth(headers) {
        return Ok((id, Some(secret)));
    }
    match body_id {
        Some(id) => Ok((id.to_string(), body_secret.map(String::from))),
        None => Err(AuthError::invalid_client("client credentials are missing")),
    }
}

/// `POST /oauth/token`
pub async fn token_handler(
    State(state): State<TokenState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    let credentials = extract_client_credentials(
        &headers,
        request.client_id.as_deref(),
        request.client_secret.as_deref(),
    );
    let (client_id, client_secret) = match credentials {
        Ok(parts) => parts,
        Err(err) => return error_response(&err),
    };

    let authed =
        match authenticate_client(&state.clients, &client_id, client_secret.as_deref()).await {
            Ok(authed) => authed,
            Err(err) => {
                debug!(client_id = %client_id, "token endpoint client authentication refused");
                return error_response(&err);
            }
        };

    let grant = match GrantRequest::parse(&request) {
        Ok(grant) => grant,
        Err(err) => return error_response(&err),
    };

    match state.service.grant(&authed.client, grant).await {
        Ok(response) => {
            debug!(client_id = %client_id, grant_type = %request.grant_type, "token granted");
            Json(response).into_response()
        }
        Err(err) => {
            if err.is_server_error() {
                warn!(error = %err, client_id = %client_id, "token grant failed");
            } else {
                debug!(error = %err, client_id = %client_id, "token grant refused");
            }
            error_response(&err)
        }
    }
}
