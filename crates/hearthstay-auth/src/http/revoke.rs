//! Revocation endpoint handler (RFC 7009).

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tracing::{debug, warn};

use crate::http::error_response;
use crate::http::token::extract_client_credentials;
use crate::oauth::authenticate_client;
use crate::storage::ClientStorage;
use crate::token::{RevocationRequest, TokenService, TokenTypeHint};

/// Shared state for the revocation endpoint.
#[derive(Clone)]
pub struct RevokeState {
    /// The token service.
    pub service: Arc<TokenService>,
    /// Client registrations, for authenticating callers.
    pub clients: Arc<dyn ClientStorage>,
}

/// `POST /oauth/revoke`
///
/// An authenticated client always receives 200, whether or not the
/// token existed, per RFC 7009. Only failed client authentication and
/// storage failures produce an error status.
pub async fn revoke_handler(
    State(state): State<RevokeState>,
    headers: HeaderMap,
    Form(request): Form<RevocationRequest>,
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
            Err(err) => return error_response(&err),
        };

    let hint = request
        .token_type_hint
        .as_deref()
        .and_then(TokenTypeHint::parse);
    match state
        .service
        .revoke(&authed.client, &request.token, hint)
        .await
    {
        Ok(()) => {
            debug!(client_id = %client_id, "revocation processed");
            Json(serde_json::json!({ "message": "revoked" })).into_response()
        }
        Err(err) => {
            warn!(error = %err, client_id = %client_id, "revocation failed");
            error_response(&err)
        }
    }
}
