//! Introspection endpoint handler (RFC 7662).

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
use crate::token::{IntrospectionRequest, TokenService};

/// Shared state for the introspection endpoint.
#[derive(Clone)]
pub struct IntrospectState {
    /// The token service.
    pub service: Arc<TokenService>,
    /// Client registrations, for authenticating callers.
    pub clients: Arc<dyn ClientStorage>,
}

/// `POST /oauth/introspect`
///
/// Authenticated callers always receive 200 with an `active` field; an
/// inactive token yields `{ "active": false }` with no hint as to why.
pub async fn introspect_handler(
    State(state): State<IntrospectState>,
    headers: HeaderMap,
    Form(request): Form<IntrospectionRequest>,
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

    if let Err(err) =
        authenticate_client(&state.clients, &client_id, client_secret.as_deref()).await
    {
        return error_response(&err);
    }

    match state.service.introspect(&request.token).await {
        Ok(response) => {
            debug!(client_id = %client_id, active = response.active, "introspection processed");
            Json(response).into_response()
        }
        Err(err) => {
            warn!(error = %err, client_id = %client_id, "introspection failed");
            error_response(&err)
        }
    }
}
