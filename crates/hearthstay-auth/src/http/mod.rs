//! Axum handlers for the OAuth 2.0 endpoints.

mod authorize;
mod introspect;
mod revoke;
mod token;

pub use authorize::{authorize_handler, authorize_post_handler, AuthorizeState};
pub use introspect::{introspect_handler, IntrospectState};
pub use revoke::{revoke_handler, RevokeState};
pub use token::{token_handler, TokenState};

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::SubjectProvider;
use crate::oauth::AuthorizationService;
use crate::storage::{ClientStorage, CodeStorage, TokenStorage};
use crate::token::TokenService;

/// Builds a router exposing the OAuth 2.0 endpoints.
pub fn oauth_router(
    clients: Arc<dyn ClientStorage>,
    codes: Arc<dyn CodeStorage>,
    tokens: Arc<dyn TokenStorage>,
    subjects: Arc<dyn SubjectProvider>,
    config: AuthConfig,
) -> Router {
    let authorization = Arc::new(AuthorizationService::new(
        clients.clone(),
        codes.clone(),
        config.clone(),
    ));
    let token_service = Arc::new(TokenService::new(codes, tokens, config));

    Router::new()
        .route(
            "/oauth/authorize",
            get(authorize_handler)
                .post(authorize_post_handler)
                .with_state(AuthorizeState {
                    service: authorization,
                    subjects,
                }),
        )
        .route(
            "/oauth/token",
            post(token_handler).with_state(TokenState {
                service: token_service.clone(),
                clients: clients.clone(),
            }),
        )
        .route(
            "/oauth/revoke",
            post(revoke_handler).with_state(RevokeState {
                service: token_service.clone(),
                clients: clients.clone(),
            }),
        )
        .route(
            "/oauth/introspect",
            post(introspect_handler).with_state(IntrospectState {
                service: token_service,
                clients,
            }),
        )
}

/// Serializes an error as an OAuth 2.0 error response body.
pub(crate) fn error_response(err: &AuthError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
        "error": err.oauth_error_code(),
        "error_description": err.to_string(),
    });
    (status, Json(body)).into_response()
}
