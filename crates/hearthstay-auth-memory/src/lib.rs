//! In-memory storage backend for the Hearthstay authorization server.
//!
//! Suitable for tests and single-process deployments. The single-use
//! operations take the store's write lock for the whole check-and-set,
//! so concurrent redemptions and rotations serialize correctly.

mod client;
mod code;
mod token;

pub use client::InMemoryClientStorage;
pub use code::InMemoryCodeStorage;
pub use token::InMemoryTokenStorage;

use hearthstay_auth::AuthError;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_poisoned<T>(_: PoisonError<RwLockReadGuard<'_, T>>) -> AuthError {
    AuthError::storage("in-memory store lock poisoned")
}

pub(crate) fn write_poisoned<T>(_: PoisonError<RwLockWriteGuard<'_, T>>) -> AuthError {
    AuthError::storage("in-memory store lock poisoned")
}
