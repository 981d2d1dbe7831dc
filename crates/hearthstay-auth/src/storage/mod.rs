//! Storage traits for the authorization server.
//!
//! Backends implement these traits; the services depend only on the
//! trait objects. The single-use guarantees for codes and refresh
//! tokens live here: `redeem_once` and `consume_refresh` are atomic
//! check-and-set operations, so two racing callers can never both win.

mod client;
mod code;
mod token;

pub use client::ClientStorage;
pub use code::{CodeRedemption, CodeStorage};
pub use token::{RefreshConsumption, TokenStorage};
