//! Minimal authorization server backed by the in-memory stores.
//!
//! Registers one demo client at startup and prints its credentials, so
//! the endpoints can be exercised with curl.

use std::sync::Arc;

use hearthstay_auth::config::AuthConfig;
use hearthstay_auth::http::oauth_router;
use hearthstay_auth::identity::StaticSubjectProvider;
use hearthstay_auth::secret::{generate_client_secret, hash_secret};
use hearthstay_auth::storage::ClientStorage;
use hearthstay_auth::types::{Client, GrantType};
use hearthstay_auth_memory::{InMemoryClientStorage, InMemoryCodeStorage, InMemoryTokenStorage};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hearthstay_auth=debug".into()),
        )
        .init();

    let clients: Arc<dyn ClientStorage> = Arc::new(InMemoryClientStorage::new());

    let secret = generate_client_secret();
    clients
        .create(&Client {
            client_id: "demo-app".to_string(),
            client_secret: Some(hash_secret(&secret)?),
            name: "Demo Application".to_string(),
            description: Some("Registered at startup for manual testing".to_string()),
            grant_types: vec![GrantType::AuthorizationCode, GrantType::RefreshToken],
            redirect_uris: vec!["https://app.example.com/callback".to_string()],
            allowed_scopes: vec!["read".to_string(), "write".to_string()],
            confidential: true,
            active: true,
            access_token_lifetime: None,
            refresh_token_lifetime: None,
        })
        .await?;
    info!(client_id = "demo-app", client_secret = %secret, "demo client registered");

    let router = oauth_router(
        clients,
        Arc::new(InMemoryCodeStorage::new()),
        Arc::new(InMemoryTokenStorage::new()),
        Arc::new(StaticSubjectProvider::new(Uuid::new_v4())),
        AuthConfig::new("http://127.0.0.1:8080"),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    info!("authorization server listening on http://127.0.0.1:8080");
    axum::serve(listener, router).await?;
    Ok(())
}
