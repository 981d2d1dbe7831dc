//! OAuth 2.0 authorization server core.
//!
//! Implements the authorization code and refresh token grants with
//! single-use codes, refresh token rotation, reuse detection with
//! family revocation, RFC 7009 revocation, and RFC 7662 introspection.
//!
//! Storage is pluggable through the traits in [`storage`]; the
//! `hearthstay-auth-memory` crate provides an in-memory backend.

pub mod audit;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod oauth;
pub mod secret;
pub mod storage;
pub mod token;
pub mod types;

pub use config::AuthConfig;
pub use error::{AuthError, ErrorCategory};

/// Convenience alias for results in this crate.
pub type AuthResult<T> = Result<T, AuthError>;

/// Commonly used types.
pub mod prelude {
    pub use crate::config::AuthConfig;
    pub use crate::error::AuthError;
    pub use crate::identity::{StaticSubjectProvider, SubjectProvider};
    pub use crate::oauth::{AuthorizationRequest, AuthorizationService, GrantRequest, TokenResponse};
    pub use crate::storage::{
        ClientStorage, CodeRedemption, CodeStorage, RefreshConsumption, TokenStorage,
    };
    pub use crate::token::{IntrospectionResponse, TokenService};
    pub use crate::types::{AuthorizationCode, Client, GrantType, TokenPair};
}
