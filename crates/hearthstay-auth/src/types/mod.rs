//! Core domain types for the authorization server.

mod client;
mod code;
mod token;

pub use client::{Client, ClientValidationError, GrantType};
pub use code::AuthorizationCode;
pub use token::{generate_token, hash_token, TokenPair};
