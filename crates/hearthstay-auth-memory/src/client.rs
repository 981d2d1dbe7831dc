//! In-memory client registration storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use hearthstay_auth::error::AuthError;
use hearthstay_auth::secret::verify_secret;
use hearthstay_auth::storage::ClientStorage;
use hearthstay_auth::types::Client;

use crate::{read_poisoned, write_poisoned};

#[derive(Default)]
struct ClientStore {
    // Insertion order preserved separately so list() is stable.
    by_id: HashMap<String, Client>,
    order: Vec<String>,
}

/// In-memory [`ClientStorage`] implementation.
#[derive(Default)]
pub struct InMemoryClientStorage {
    store: RwLock<ClientStore>,
}

impl InMemoryClientStorage {
    /// Creates an empty client store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for InMemoryClientStorage {
    async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, AuthError> {
        let store = self.store.read().map_err(read_poisoned)?;
        Ok(store.by_id.get(client_id).cloned())
    }

    async fn create(&self, client: &Client) -> Result<(), AuthError> {
        client
            .validate()
            .map_err(|e| AuthError::invalid_request(e.to_string()))?;
        let mut store = self.store.write().map_err(write_poisoned)?;
        if store.by_id.contains_key(&client.client_id) {
            return Err(AuthError::invalid_request(format!(
                "client {} already exists",
                client.client_id
            )));
        }
        store.order.push(client.client_id.clone());
        store.by_id.insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), AuthError> {
        client
            .validate()
            .map_err(|e| AuthError::invalid_request(e.to_string()))?;
        let mut store = self.store.write().map_err(write_poisoned)?;
        if !store.by_id.contains_key(&client.client_id) {
            return Err(AuthError::invalid_request(format!(
                "client {} does not exist",
                client.client_id
            )));
        }
        store.by_id.insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn delete(&self, client_id: &str) -> Result<bool, AuthError> {
        let mut store = self.store.write().map_err(write_poisoned)?;
        let removed = store.by_id.remove(client_id).is_some();
        if removed {
            store.order.retain(|id| id != client_id);
        }
        Ok(removed)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Client>, AuthError> {
        let store = self.store.read().map_err(read_poisoned)?;
        Ok(store
            .order
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .filter_map(|id| store.by_id.get(id).cloned())
            .collect())
    }

    async fn verify_secret(&self, client_id: &str, secret: &str) -> Result<bool, AuthError> {
        let hash = {
            let store = self.store.read().map_err(read_poisoned)?;
            match store.by_id.get(client_id).and_then(|c| c.client_secret.clone()) {
                Some(hash) => hash,
                None => return Ok(false),
            }
        };
        verify_secret(secret, &hash)
    }
}
