//! In-memory authorization code storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use hearthstay_auth::error::AuthError;
use hearthstay_auth::storage::{CodeRedemption, CodeStorage};
use hearthstay_auth::types::AuthorizationCode;

use crate::{read_poisoned, write_poisoned};

/// In-memory [`CodeStorage`] implementation.
#[derive(Default)]
pub struct InMemoryCodeStorage {
    codes: RwLock<HashMap<String, AuthorizationCode>>,
}

impl InMemoryCodeStorage {
    /// Creates an empty code store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CodeStorage for InMemoryCodeStorage {
    async fn create(&self, code: &AuthorizationCode) -> Result<(), AuthError> {
        let mut codes = self.codes.write().map_err(write_poisoned)?;
        codes.insert(code.code.clone(), code.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<AuthorizationCode>, AuthError> {
        let codes = self.codes.read().map_err(read_poisoned)?;
        Ok(codes.get(code).cloned())
    }

    async fn redeem_once(&self, code: &str) -> Result<CodeRedemption, AuthError> {
        // The whole check-and-set happens under the write lock, so two
        // racing redemptions cannot both observe an unredeemed code.
        let mut codes = self.codes.write().map_err(write_poisoned)?;
        let Some(record) = codes.get_mut(code) else {
            return Ok(CodeRedemption::NotFound);
        };
        if record.redeemed_at.is_some() {
            return Ok(CodeRedemption::AlreadyRedeemed);
        }
        if record.is_expired() {
            return Ok(CodeRedemption::Expired);
        }
        let snapshot = record.clone();
        record.redeemed_at = Some(OffsetDateTime::now_utc());
        Ok(CodeRedemption::Redeemed(snapshot))
    }

    async fn cleanup_expired(&self) -> Result<u64, AuthError> {
        let mut codes = self.codes.write().map_err(write_poisoned)?;
        let before = codes.len();
        codes.retain(|_, c| !c.is_expired());
        let removed = (before - codes.len()) as u64;
        if removed > 0 {
            tracing::debug!(removed, "expired authorization codes removed");
        }
        Ok(removed)
    }

    async fn delete_by_client(&self, client_id: &str) -> Result<u64, AuthError> {
        let mut codes = self.codes.write().map_err(write_poisoned)?;
        let before = codes.len();
        codes.retain(|_, c| c.client_id != client_id);
        Ok((before - codes.len()) as u64)
    }
}
