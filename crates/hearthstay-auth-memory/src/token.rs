//! In-memory token pair storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use hearthstay_auth::error::AuthError;
use hearthstay_auth::storage::{RefreshConsumption, TokenStorage};
use hearthstay_auth::types::TokenPair;

use crate::{read_poisoned, write_poisoned};

#[derive(Default)]
struct TokenStore {
    pairs: HashMap<Uuid, TokenPair>,
    access_index: HashMap<String, Uuid>,
    refresh_index: HashMap<String, Uuid>,
}

impl TokenStore {
    fn by_access(&self, hash: &str) -> Option<&TokenPair> {
        self.access_index.get(hash).and_then(|id| self.pairs.get(id))
    }

    fn by_refresh(&self, hash: &str) -> Option<&TokenPair> {
        self.refresh_index.get(hash).and_then(|id| self.pairs.get(id))
    }
}

/// In-memory [`TokenStorage`] implementation.
#[derive(Default)]
pub struct InMemoryTokenStorage {
    store: RwLock<TokenStore>,
}

impl InMemoryTokenStorage {
    /// Creates an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn create(&self, pair: &TokenPair) -> Result<(), AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        store
            .access_index
            .insert(pair.access_token_hash.clone(), pair.id);
        if let Some(refresh_hash) = &pair.refresh_token_hash {
            store.refresh_index.insert(refresh_hash.clone(), pair.id);
        }
        store.pairs.insert(pair.id, pair.clone());
        Ok(())
    }

    async fn find_by_access_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError> {
        let store = self.store.read().map_err(read_poisoned)?;
        Ok(store.by_access(hash).cloned())
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError> {
        let store = self.store.read().map_err(read_poisoned)?;
        Ok(store.by_refresh(hash).cloned())
    }

    async fn consume_refresh(&self, hash: &str) -> Result<RefreshConsumption, AuthError> {
        // Check-and-set under the write lock: exactly one of any number
        // of racing consumers observes Consumed.
        let mut store = self.store.write().map_err(write_poisoned)?;
        let Some(&id) = store.refresh_index.get(hash) else {
            return Ok(RefreshConsumption::NotFound);
        };
        let Some(pair) = store.pairs.get_mut(&id) else {
            return Ok(RefreshConsumption::NotFound);
        };
        if pair.revoked_at.is_some() || pair.refresh_consumed_at.is_some() {
            return Ok(RefreshConsumption::Revoked(pair.clone()));
        }
        if pair.is_refresh_expired() {
            return Ok(RefreshConsumption::Expired);
        }
        let snapshot = pair.clone();
        pair.refresh_consumed_at = Some(OffsetDateTime::now_utc());
        Ok(RefreshConsumption::Consumed(snapshot))
    }

    async fn revoke_access(&self, hash: &str) -> Result<bool, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        let Some(&id) = store.access_index.get(hash) else {
            return Ok(false);
        };
        if let Some(pair) = store.pairs.get_mut(&id) {
            pair.access_revoked_at = Some(OffsetDateTime::now_utc());
            return Ok(true);
        }
        Ok(false)
    }

    async fn revoke_pair(&self, id: Uuid) -> Result<bool, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        if let Some(pair) = store.pairs.get_mut(&id) {
            pair.revoked_at = Some(OffsetDateTime::now_utc());
            return Ok(true);
        }
        Ok(false)
    }

    async fn revoke_family(&self, family_id: Uuid) -> Result<u64, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        let now = OffsetDateTime::now_utc();
        let mut revoked = 0;
        for pair in store.pairs.values_mut() {
            if pair.family_id == family_id && pair.revoked_at.is_none() {
                pair.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn cleanup_expired(&self) -> Result<u64, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        let now = OffsetDateTime::now_utc();
        let dead: Vec<Uuid> = store
            .pairs
            .values()
            .filter(|p| {
                now >= p.access_expires_at
                    && p.refresh_expires_at.map(|r| now >= r).unwrap_or(true)
            })
            .map(|p| p.id)
            .collect();
        for id in &dead {
            if let Some(pair) = store.pairs.remove(id) {
                store.access_index.remove(&pair.access_token_hash);
                if let Some(refresh_hash) = &pair.refresh_token_hash {
                    store.refresh_index.remove(refresh_hash);
                }
            }
        }
        if !dead.is_empty() {
            tracing::debug!(removed = dead.len(), "expired token pairs removed");
        }
        Ok(dead.len() as u64)
    }

    async fn delete_by_client(&self, client_id: &str) -> Result<u64, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        let owned: Vec<Uuid> = store
            .pairs
            .values()
            .filter(|p| p.client_id == client_id)
            .map(|p| p.id)
            .collect();
        for id in &owned {
            if let Some(pair) = store.pairs.remove(id) {
                store.access_index.remove(&pair.access_token_hash);
                if let Some(refresh_hash) = &pair.refresh_token_hash {
                    store.refresh_index.remove(refresh_hash);
                }
            }
        }
        Ok(owned.len() as u64)
    }
}
