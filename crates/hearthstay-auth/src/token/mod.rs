//! Token lifecycle: issuance, rotation, validation, revocation, and
//! introspection.

mod introspection;
mod revocation;
mod service;

pub use introspection::{IntrospectionRequest, IntrospectionResponse};
pub use revocation::{RevocationRequest, TokenTypeHint};
pub use service::{AccessTokenInfo, TokenService};
