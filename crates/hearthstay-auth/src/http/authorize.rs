//! Authorization endpoint handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use tracing::{debug, warn};

use crate::http::error_response;
use crate::identity::SubjectProvider;
use crate::oauth::{AuthorizationRequest, AuthorizationService};

/// Shared state for the authorization endpoint.
#[derive(Clone)]
pub struct AuthorizeState {
    /// The authorization service.
    pub service: Arc<AuthorizationService>,
    /// Resolves the authenticated resource owner.
    pub subjects: Arc<dyn SubjectProvider>,
}

/// `GET /oauth/authorize`
///
/// On success responds with a redirect delivering the code. On failure
/// responds with a direct JSON error; nothing is ever sent to an
/// unvalidated redirect URI.
pub async fn authorize_handler(
    State(state): State<AuthorizeState>,
    headers: HeaderMap,
    Query(request): Query<AuthorizationRequest>,
) -> Response {
    handle_authorize(&state, &headers, request).await
}

/// `POST /oauth/authorize`
///
/// Same behavior as the GET form, for consent pages that submit the
/// decision as a form.
pub async fn authorize_post_handler(
    State(state): State<AuthorizeState>,
    headers: HeaderMap,
    Form(request): Form<AuthorizationRequest>,
) -> Response {
    handle_authorize(&state, &headers, request).await
}

async fn handle_authorize(
    state: &AuthorizeState,
    headers: &HeaderMap,
    request: AuthorizationRequest,
) -> Response {
    let subject = match state.subjects.current_subject(headers).await {
        Ok(subject) => subject,
        Err(err) => {
            warn!(error = %err, "subject resolution failed");
            return error_response(&err);
        }
    };

    match state.service.authorize(&request, subject).await {
        Ok(grant) => match grant.to_redirect_url() {
            Ok(url) => {
                debug!(client_id = %request.client_id, "authorization granted");
                Redirect::to(url.as_str()).into_response()
            }
            Err(err) => error_response(&err),
        },
        Err(err) => {
            if err.is_server_error() {
                warn!(error = %err, client_id = %request.client_id, "authorization failed");
            } else {
                debug!(error = %err, client_id = %request.client_id, "authorization refused");
            }
            error_response(&err)
        }
    }
}
