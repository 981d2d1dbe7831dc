//! OAuth 2.0 protocol layer: authorization endpoint service, client
//! authentication, and token endpoint request/response types.

mod authorize;
mod client_auth;
mod grant;
mod service;

pub use authorize::{AuthorizationGrant, AuthorizationRequest};
pub use client_auth::{authenticate_client, parse_basic_auth, AuthenticatedClient};
pub use grant::{GrantRequest, TokenRequest, TokenResponse};
pub use service::AuthorizationService;
