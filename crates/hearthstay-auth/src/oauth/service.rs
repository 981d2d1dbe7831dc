//! Authorization endpoint service.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::audit;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::oauth::authorize::{AuthorizationGrant, AuthorizationRequest};
use crate::storage::{ClientStorage, CodeStorage};
use crate::types::{AuthorizationCode, GrantType};

/// Handles authorization requests: validates the client, redirect URI,
/// and scope, then mints a single-use authorization code.
pub struct AuthorizationService {
    clients: Arc<dyn ClientStorage>,
    codes: Arc<dyn CodeStorage>,
    config: AuthConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    pub fn new(
        clients: Arc<dyn ClientStorage>,
        codes: Arc<dyn CodeStorage>,
        config: AuthConfig,
    ) -> Self {
        Self {
            clients,
            codes,
            config,
        }
    }

    /// Processes an authorization request for the given authenticated
    /// subject.
    ///
    /// Validation order: response type, client existence and status,
    /// redirect URI, grant type, scope, then subject. The redirect URI
    /// is checked before anything is ever delivered to it; a request
    /// with an unregistered URI gets a direct error, never a redirect.
    pub async fn authorize(
        &self,
        request: &AuthorizationRequest,
        subject: Option<Uuid>,
    ) -> Result<AuthorizationGrant, AuthError> {
        if request.response_type != "code" {
            return Err(AuthError::unsupported_response_type(&request.response_type));
        }

        let client = self
            .clients
            .find_by_client_id(&request.client_id)
            .await?
            .ok_or_else(|| AuthError::invalid_client("unknown client"))?;

        if !client.active {
            return Err(AuthError::invalid_client("client is not active"));
        }

        if !client.is_redirect_uri_allowed(&request.redirect_uri) {
            return Err(AuthError::invalid_redirect(
                "redirect_uri is not registered for this client",
            ));
        }

        if !client.is_grant_type_allowed(GrantType::AuthorizationCode) {
            return Err(AuthError::unsupported_grant_type(
                GrantType::AuthorizationCode.as_str(),
            ));
        }

        let scopes = request.scopes();
        if !client.are_scopes_allowed(&scopes) {
            return Err(AuthError::invalid_scope(
                "requested scope exceeds the client's allowed scopes",
            ));
        }

        let Some(user_id) = subject else {
            return Err(AuthError::unauthorized(
                "authorization requires an authenticated user",
            ));
        };

        let now = OffsetDateTime::now_utc();
        let code = AuthorizationCode {
            id: Uuid::new_v4(),
            code: AuthorizationCode::generate_code(),
            client_id: client.client_id.clone(),
            user_id,
            scope: scopes.join(" "),
            redirect_uri: request.redirect_uri.clone(),
            issued_at: now,
            expires_at: now + self.config.code_duration(),
            redeemed_at: None,
        };

        self.codes.create(&code).await?;
        audit::code_issued(&client.client_id, user_id, &code.scope);
        debug!(client_id = %client.client_id, "authorization code minted");

        Ok(AuthorizationGrant {
            code: code.code,
            state: request.state.clone(),
            redirect_uri: request.redirect_uri.clone(),
        })
    }
}
