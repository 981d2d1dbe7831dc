//! Token grant, validation, revocation, and introspection service.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::audit;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::oauth::{GrantRequest, TokenResponse};
use crate::storage::{CodeRedemption, CodeStorage, RefreshConsumption, TokenStorage};
use crate::token::introspection::IntrospectionResponse;
use crate::token::revocation::TokenTypeHint;
use crate::types::{generate_token, hash_token, Client, GrantType, TokenPair};

/// Details of a validated access token.
#[derive(Debug, Clone)]
pub struct AccessTokenInfo {
    /// The resource owner the token represents.
    pub user_id: Uuid,
    /// The client the token was issued to.
    pub client_id: String,
    /// The token's scope.
    pub scope: String,
    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

/// Issues, rotates, validates, revokes, and introspects tokens.
pub struct TokenService {
    codes: Arc<dyn CodeStorage>,
    tokens: Arc<dyn TokenStorage>,
    config: AuthConfig,
}

impl TokenService {
    /// Creates a new token service.
    pub fn new(
        codes: Arc<dyn CodeStorage>,
        tokens: Arc<dyn TokenStorage>,
        config: AuthConfig,
    ) -> Self {
        Self {
            codes,
            tokens,
            config,
        }
    }

    /// Processes a token grant for an authenticated client.
    pub async fn grant(
        &self,
        client: &Client,
        request: GrantRequest,
    ) -> Result<TokenResponse, AuthError> {
        match request {
            GrantRequest::AuthorizationCode { code, redirect_uri } => {
                self.exchange_code(client, &code, redirect_uri.as_deref())
                    .await
            }
            GrantRequest::RefreshToken {
                refresh_token,
                scope,
            } => self.refresh(client, &refresh_token, scope.as_deref()).await,
        }
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// The precise failure cause goes to the audit log; the wire error
    /// is a uniform `invalid_grant` so a caller cannot distinguish an
    /// expired code from a replayed or fabricated one.
    async fn exchange_code(
        &self,
        client: &Client,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<TokenResponse, AuthError> {
        if !client.is_grant_type_allowed(GrantType::AuthorizationCode) {
            return Err(AuthError::unsupported_grant_type(
                GrantType::AuthorizationCode.as_str(),
            ));
        }

        let refused = || AuthError::invalid_grant("authorization code is not valid");

        let record = match self.codes.redeem_once(code).await? {
            CodeRedemption::Redeemed(record) => record,
            CodeRedemption::Expired => {
                audit::code_redemption_failed(&client.client_id, "expired");
                return Err(refused());
            }
            CodeRedemption::AlreadyRedeemed => {
                audit::code_redemption_failed(&client.client_id, "already redeemed");
                return Err(refused());
            }
            CodeRedemption::NotFound => {
                audit::code_redemption_failed(&client.client_id, "unknown code");
                return Err(refused());
            }
        };

        // The code is consumed at this point regardless of what follows.
        if record.client_id != client.client_id {
            audit::code_redemption_failed(&client.client_id, "client mismatch");
            return Err(refused());
        }

        match redirect_uri {
            Some(uri) if uri == record.redirect_uri => {}
            Some(_) => {
                audit::code_redemption_failed(&client.client_id, "redirect_uri mismatch");
                return Err(refused());
            }
            None => {
                audit::code_redemption_failed(&client.client_id, "redirect_uri missing");
                return Err(refused());
            }
        }

        let (response, pair) = self
            .issue_pair(client, record.user_id, &record.scope, None, None)
            .await?;
        audit::token_issued(&client.client_id, pair.user_id, pair.family_id, &pair.scope);
        Ok(response)
    }

    /// Rotates a refresh token: the presented token's pair is revoked
    /// and a successor pair is issued in the same family.
    ///
    /// Presenting an already-revoked refresh token is treated as reuse
    /// and revokes the entire family.
    async fn refresh(
        &self,
        client: &Client,
        refresh_token: &str,
        requested_scope: Option<&str>,
    ) -> Result<TokenResponse, AuthError> {
        if !client.is_grant_type_allowed(GrantType::RefreshToken) {
            return Err(AuthError::unsupported_grant_type(
                GrantType::RefreshToken.as_str(),
            ));
        }

        let refused = || AuthError::invalid_grant("refresh token is not valid");
        let hash = hash_token(refresh_token);

        // A scope error is correctable by the client, so it must not
        // burn the token: check against the stored pair before
        // consuming, or the corrected retry would read as reuse.
        if let Some(pair) = self.tokens.find_by_refresh_hash(&hash).await? {
            narrowed_scope(&pair.scope, requested_scope)?;
        }

        let consumed = match self.tokens.consume_refresh(&hash).await? {
            RefreshConsumption::Consumed(pair) => pair,
            RefreshConsumption::Expired => {
                audit::refresh_failed(&client.client_id, "expired");
                return Err(refused());
            }
            RefreshConsumption::Revoked(pair) => {
                let revoked = self.tokens.revoke_family(pair.family_id).await?;
                audit::refresh_reuse_detected(&client.client_id, pair.family_id, revoked);
                return Err(refused());
            }
            RefreshConsumption::NotFound => {
                audit::refresh_failed(&client.client_id, "unknown token");
                return Err(refused());
            }
        };

        if consumed.client_id != client.client_id {
            audit::refresh_failed(&client.client_id, "client mismatch");
            return Err(refused());
        }

        let scope = narrowed_scope(&consumed.scope, requested_scope)?;

        let (response, pair) = self
            .issue_pair(
                client,
                consumed.user_id,
                &scope,
                Some(consumed.family_id),
                Some(consumed.refresh_expires_at),
            )
            .await?;
        audit::token_issued(&client.client_id, pair.user_id, pair.family_id, &pair.scope);
        Ok(response)
    }

    /// Mints, persists, and serializes a new token pair.
    ///
    /// A refresh token is issued only when the client is registered for
    /// the refresh grant. Rotation successors keep the original
    /// family's refresh expiry rather than extending it.
    async fn issue_pair(
        &self,
        client: &Client,
        user_id: Uuid,
        scope: &str,
        family_id: Option<Uuid>,
        inherited_refresh_expiry: Option<Option<OffsetDateTime>>,
    ) -> Result<(TokenResponse, TokenPair), AuthError> {
        let now = OffsetDateTime::now_utc();
        let access_lifetime = client
            .effective_access_lifetime(self.config.access_token_duration().whole_seconds());

        let access_token = generate_token();
        let with_refresh = client.is_grant_type_allowed(GrantType::RefreshToken);
        let refresh_token = with_refresh.then(generate_token);

        let refresh_expires_at = match inherited_refresh_expiry {
            Some(inherited) => inherited,
            None => with_refresh.then(|| {
                now + time::Duration::seconds(client.effective_refresh_lifetime(
                    self.config.refresh_token_duration().whole_seconds(),
                ))
            }),
        };

        let pair = TokenPair {
            id: Uuid::new_v4(),
            family_id: family_id.unwrap_or_else(Uuid::new_v4),
            access_token_hash: hash_token(&access_token),
            refresh_token_hash: refresh_token.as_deref().map(hash_token),
            client_id: client.client_id.clone(),
            user_id,
            scope: scope.to_string(),
            issued_at: now,
            access_expires_at: now + time::Duration::seconds(access_lifetime),
            refresh_expires_at,
            refresh_consumed_at: None,
            revoked_at: None,
            access_revoked_at: None,
        };

        self.tokens.create(&pair).await?;
        debug!(client_id = %client.client_id, family_id = %pair.family_id, "token pair persisted");

        let response = TokenResponse::bearer(access_token, refresh_token, access_lifetime, pair.scope.clone());
        Ok((response, pair))
    }

    /// Validates an access token and returns its details.
    pub async fn validate_access(&self, token: &str) -> Result<AccessTokenInfo, AuthError> {
        let hash = hash_token(token);
        let pair = self
            .tokens
            .find_by_access_hash(&hash)
            .await?
            .filter(TokenPair::is_access_active)
            .ok_or_else(|| AuthError::invalid_token("access token is not active"))?;

        Ok(AccessTokenInfo {
            user_id: pair.user_id,
            client_id: pair.client_id,
            scope: pair.scope,
            expires_at: pair.access_expires_at,
        })
    }

    /// Revokes a token presented by its owning client.
    ///
    /// Revoking an access token leaves its refresh token usable;
    /// revoking a refresh token kills the whole pair. Unknown tokens
    /// and tokens owned by another client succeed silently. The hint
    /// only orders the lookups; a wrong hint still finds the token.
    pub async fn revoke(
        &self,
        client: &Client,
        token: &str,
        hint: Option<TokenTypeHint>,
    ) -> Result<(), AuthError> {
        let hash = hash_token(token);

        if hint == Some(TokenTypeHint::RefreshToken) {
            if !self.revoke_by_refresh(client, &hash).await? {
                self.revoke_by_access(client, &hash).await?;
            }
        } else if !self.revoke_by_access(client, &hash).await? {
            self.revoke_by_refresh(client, &hash).await?;
        }
        Ok(())
    }

    /// Returns `true` when a pair was found by access hash, whether or
    /// not the caller owned it.
    async fn revoke_by_access(&self, client: &Client, hash: &str) -> Result<bool, AuthError> {
        let Some(pair) = self.tokens.find_by_access_hash(hash).await? else {
            return Ok(false);
        };
        if pair.client_id == client.client_id {
            self.tokens.revoke_access(hash).await?;
            audit::token_revoked(&client.client_id, "access_token");
        }
        Ok(true)
    }

    /// Returns `true` when a pair was found by refresh hash, whether or
    /// not the caller owned it.
    async fn revoke_by_refresh(&self, client: &Client, hash: &str) -> Result<bool, AuthError> {
        let Some(pair) = self.tokens.find_by_refresh_hash(hash).await? else {
            return Ok(false);
        };
        if pair.client_id == client.client_id {
            self.tokens.revoke_pair(pair.id).await?;
            audit::token_revoked(&client.client_id, "refresh_token");
        }
        Ok(true)
    }

    /// Introspects a token.
    ///
    /// Every non-active case, whatever its internal cause, yields the
    /// same `{ "active": false }`. Only storage failures surface as
    /// errors.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, AuthError> {
        let hash = hash_token(token);

        if let Some(pair) = self.tokens.find_by_access_hash(&hash).await? {
            if pair.is_access_active() {
                return Ok(IntrospectionResponse {
                    active: true,
                    scope: Some(pair.scope),
                    client_id: Some(pair.client_id),
                    sub: Some(pair.user_id.to_string()),
                    token_type: Some("access_token".to_string()),
                    exp: Some(pair.access_expires_at.unix_timestamp()),
                    iat: Some(pair.issued_at.unix_timestamp()),
                    iss: Some(self.config.issuer.clone()),
                });
            }
            return Ok(IntrospectionResponse::inactive());
        }

        if let Some(pair) = self.tokens.find_by_refresh_hash(&hash).await? {
            if pair.is_refresh_active() {
                return Ok(IntrospectionResponse {
                    active: true,
                    scope: Some(pair.scope),
                    client_id: Some(pair.client_id),
                    sub: Some(pair.user_id.to_string()),
                    token_type: Some("refresh_token".to_string()),
                    exp: pair.refresh_expires_at.map(|t| t.unix_timestamp()),
                    iat: Some(pair.issued_at.unix_timestamp()),
                    iss: Some(self.config.issuer.clone()),
                });
            }
            return Ok(IntrospectionResponse::inactive());
        }

        Ok(IntrospectionResponse::inactive())
    }
}

/// Computes a successor scope. Scope may only narrow the original
/// grant, never widen it.
fn narrowed_scope(granted: &str, requested: Option<&str>) -> Result<String, AuthError> {
    let Some(requested) = requested else {
        return Ok(granted.to_string());
    };
    let granted: Vec<&str> = granted.split_whitespace().collect();
    let narrowed: Vec<&str> = requested.split_whitespace().collect();
    if !narrowed.iter().all(|s| granted.contains(s)) {
        return Err(AuthError::invalid_scope(
            "requested scope exceeds the original grant",
        ));
    }
    Ok(narrowed.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorizationCode;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct MemCodeStorage {
        codes: RwLock<HashMap<String, AuthorizationCode>>,
    }

    impl MemCodeStorage {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                codes: RwLock::new(HashMap::new()),
            })
        }
    }

    #[async_trait]
    impl CodeStorage for MemCodeStorage {
        async fn create(&self, code: &AuthorizationCode) -> Result<(), AuthError> {
            self.codes
                .write()
                .unwrap()
                .insert(code.code.clone(), code.clone());
            Ok(())
        }
        async fn find_by_code(
            &self,
            code: &str,
        ) -> Result<Option<AuthorizationCode>, AuthError> {
            Ok(self.codes.read().unwrap().get(code).cloned())
        }
        async fn redeem_once(&self, code: &str) -> Result<CodeRedemption, AuthError> {
            let mut codes = self.codes.write().unwrap();
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
            Ok(0)
        }
        async fn delete_by_client(&self, _client_id: &str) -> Result<u64, AuthError> {
            Ok(0)
        }
    }

    struct MemTokenStorage {
        pairs: RwLock<HashMap<Uuid, TokenPair>>,
    }

    impl MemTokenStorage {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                pairs: RwLock::new(HashMap::new()),
            })
        }
    }

    #[async_trait]
    impl TokenStorage for MemTokenStorage {
        async fn create(&self, pair: &TokenPair) -> Result<(), AuthError> {
            self.pairs.write().unwrap().insert(pair.id, pair.clone());
            Ok(())
        }
        async fn find_by_access_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError> {
            Ok(self
                .pairs
                .read()
                .unwrap()
                .values()
                .find(|p| p.access_token_hash == hash)
                .cloned())
        }
        async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<TokenPair>, AuthError> {
            Ok(self
                .pairs
                .read()
                .unwrap()
                .values()
                .find(|p| p.refresh_token_hash.as_deref() == Some(hash))
                .cloned())
        }
        async fn consume_refresh(&self, hash: &str) -> Result<RefreshConsumption, AuthError> {
            let mut pairs = self.pairs.write().unwrap();
            let Some(pair) = pairs
                .values_mut()
                .find(|p| p.refresh_token_hash.as_deref() == Some(hash))
            else {
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
            let mut pairs = self.pairs.write().unwrap();
            if let Some(pair) = pairs
                .values_mut()
                .find(|p| p.access_token_hash == hash)
            {
                pair.access_revoked_at = Some(OffsetDateTime::now_utc());
                return Ok(true);
            }
            Ok(false)
        }
        async fn revoke_pair(&self, id: Uuid) -> Result<bool, AuthError> {
            let mut pairs = self.pairs.write().unwrap();
            if let Some(pair) = pairs.get_mut(&id) {
                pair.revoked_at = Some(OffsetDateTime::now_utc());
                return Ok(true);
            }
            Ok(false)
        }
        async fn revoke_family(&self, family_id: Uuid) -> Result<u64, AuthError> {
            let mut pairs = self.pairs.write().unwrap();
            let mut revoked = 0;
            for pair in pairs.values_mut() {
                if pair.family_id == family_id && pair.revoked_at.is_none() {
                    pair.revoked_at = Some(OffsetDateTime::now_utc());
                    revoked += 1;
                }
            }
            Ok(revoked)
        }
        async fn cleanup_expired(&self) -> Result<u64, AuthError> {
            Ok(0)
        }
        async fn delete_by_client(&self, _client_id: &str) -> Result<u64, AuthError> {
            Ok(0)
        }
    }

    fn sample_client() -> Client {
        Client {
            client_id: "web-app".to_string(),
            client_secret: Some("hashed".to_string()),
            name: "Web App".to_string(),
            description: None,
            grant_types: vec![GrantType::AuthorizationCode, GrantType::RefreshToken],
            redirect_uris: vec!["https://app.example.com/cb".to_string()],
            allowed_scopes: vec!["read".to_string(), "write".to_string()],
            confidential: true,
            active: true,
            access_token_lifetime: None,
            refresh_token_lifetime: None,
        }
    }

    struct Fixture {
        service: TokenService,
        codes: Arc<MemCodeStorage>,
        tokens: Arc<MemTokenStorage>,
    }

    fn fixture() -> Fixture {
        let codes = MemCodeStorage::new();
        let tokens = MemTokenStorage::new();
        let service = TokenService::new(codes.clone(), tokens.clone(), AuthConfig::default());
        Fixture {
            service,
            codes,
            tokens,
        }
    }

    async fn seed_code(fixture: &Fixture, client: &Client) -> AuthorizationCode {
        let now = OffsetDateTime::now_utc();
        let code = AuthorizationCode {
            id: Uuid::new_v4(),
            code: AuthorizationCode::generate_code(),
            client_id: client.client_id.clone(),
            user_id: Uuid::new_v4(),
            scope: "read write".to_string(),
            redirect_uri: "https://app.example.com/cb".to_string(),
            issued_at: now,
            expires_at: now + time::Duration::minutes(10),
            redeemed_at: None,
        };
        fixture.codes.create(&code).await.unwrap();
        code
    }

    fn code_grant(code: &AuthorizationCode) -> GrantRequest {
        GrantRequest::AuthorizationCode {
            code: code.code.clone(),
            redirect_uri: Some(code.redirect_uri.clone()),
        }
    }

    #[tokio::test]
    async fn test_code_exchange_issues_pair() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let response = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.scope, "read write");
        assert!(response.refresh_token.is_some());

        let info = fx
            .service
            .validate_access(&response.access_token)
            .await
            .unwrap();
        assert_eq!(info.user_id, code.user_id);
        assert_eq!(info.client_id, "web-app");
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let err = fx
            .service
            .grant(&client, code_grant(&code))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_expired_code_rejected() {
        let fx = fixture();
        let client = sample_client();
        let mut code = seed_code(&fx, &client).await;
        code.expires_at = OffsetDateTime::now_utc() - time::Duration::seconds(1);
        fx.codes.create(&code).await.unwrap();

        let err = fx
            .service
            .grant(&client, code_grant(&code))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_code_bound_to_client() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let mut other = sample_client();
        other.client_id = "other-app".to_string();

        let err = fx
            .service
            .grant(&other, code_grant(&code))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_redirect_uri_must_match_at_redemption() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::AuthorizationCode {
                    code: code.code.clone(),
                    redirect_uri: Some("https://app.example.com/other".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_no_refresh_token_without_refresh_grant() {
        let fx = fixture();
        let mut client = sample_client();
        client.grant_types = vec![GrantType::AuthorizationCode];
        let code = seed_code(&fx, &client).await;

        let response = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        assert!(response.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_rotates_refresh_but_not_access() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let refresh = first.refresh_token.clone().unwrap();

        let second = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: refresh.clone(),
                    scope: None,
                },
            )
            .await
            .unwrap();
        assert_ne!(second.access_token, first.access_token);
        assert_ne!(second.refresh_token.as_deref(), Some(refresh.as_str()));

        // The predecessor's access token rides out its own expiry,
        // independent of the rotation.
        fx.service
            .validate_access(&first.access_token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_refresh_reuse_revokes_family() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let old_refresh = first.refresh_token.clone().unwrap();

        let second = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: old_refresh.clone(),
                    scope: None,
                },
            )
            .await
            .unwrap();

        // Replaying the consumed refresh token poisons the family.
        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: old_refresh,
                    scope: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));

        // The current generation is dead too.
        let err = fx
            .service
            .validate_access(&second.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: second.refresh_token.unwrap(),
                    scope: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_rotation_preserves_family_and_refresh_expiry() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let first_pair = fx
            .tokens
            .find_by_access_hash(&hash_token(&first.access_token))
            .await
            .unwrap()
            .unwrap();

        let second = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: first.refresh_token.unwrap(),
                    scope: None,
                },
            )
            .await
            .unwrap();
        let second_pair = fx
            .tokens
            .find_by_access_hash(&hash_token(&second.access_token))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(second_pair.family_id, first_pair.family_id);
        assert_eq!(second_pair.user_id, first_pair.user_id);
        assert_eq!(second_pair.refresh_expires_at, first_pair.refresh_expires_at);
    }

    #[tokio::test]
    async fn test_refresh_scope_narrowing() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let narrowed = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: first.refresh_token.unwrap(),
                    scope: Some("read".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(narrowed.scope, "read");
    }

    #[tokio::test]
    async fn test_refresh_scope_expansion_rejected() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;

        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: first.refresh_token.unwrap(),
                    scope: Some("read write admin".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));
    }

    #[tokio::test]
    async fn test_refresh_scope_rejection_leaves_token_usable() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let refresh = first.refresh_token.unwrap();

        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: refresh.clone(),
                    scope: Some("read write admin".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));

        // The corrected retry rotates normally instead of tripping the
        // reuse alarm, and the first access token stays live.
        let rotated = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: refresh,
                    scope: Some("read".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(rotated.scope, "read");
        fx.service.validate_access(&first.access_token).await.unwrap();
        fx.service.validate_access(&rotated.access_token).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_bound_to_client() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let first = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        let mut other = sample_client();
        other.client_id = "other-app".to_string();

        let err = fx
            .service
            .grant(
                &other,
                GrantRequest::RefreshToken {
                    refresh_token: first.refresh_token.unwrap(),
                    scope: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_revoke_access_token_leaves_refresh_usable() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        fx.service
            .revoke(&client, &issued.access_token, None)
            .await
            .unwrap();

        let err = fx
            .service
            .validate_access(&issued.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));

        // The refresh half still rotates.
        fx.service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: issued.refresh_token.unwrap(),
                    scope: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_revoke_refresh_token_kills_pair() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        let refresh = issued.refresh_token.unwrap();

        fx.service.revoke(&client, &refresh, None).await.unwrap();

        let err = fx
            .service
            .validate_access(&issued.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: refresh,
                    scope: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[tokio::test]
    async fn test_revoke_with_wrong_hint_still_finds_token() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        fx.service
            .revoke(
                &client,
                &issued.access_token,
                Some(TokenTypeHint::RefreshToken),
            )
            .await
            .unwrap();

        let err = fx
            .service
            .validate_access(&issued.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
        // The refresh half is untouched by an access-token revocation.
        fx.service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: issued.refresh_token.unwrap(),
                    scope: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_succeeds() {
        let fx = fixture();
        let client = sample_client();
        fx.service.revoke(&client, "never-issued", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_other_clients_token_is_silent_noop() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        let mut other = sample_client();
        other.client_id = "other-app".to_string();
        fx.service
            .revoke(&other, &issued.access_token, None)
            .await
            .unwrap();

        // Still valid for its real owner.
        fx.service
            .validate_access(&issued.access_token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_introspect_active_access_token() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        let response = fx.service.introspect(&issued.access_token).await.unwrap();
        assert!(response.active);
        assert_eq!(response.client_id.as_deref(), Some("web-app"));
        assert_eq!(response.token_type.as_deref(), Some("access_token"));
        assert_eq!(response.sub, Some(code.user_id.to_string()));
        assert!(response.exp.is_some());
    }

    #[tokio::test]
    async fn test_introspect_refresh_token() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();

        let response = fx
            .service
            .introspect(issued.refresh_token.as_deref().unwrap())
            .await
            .unwrap();
        assert!(response.active);
        assert_eq!(response.token_type.as_deref(), Some("refresh_token"));
    }

    #[tokio::test]
    async fn test_introspect_revoked_and_unknown_look_identical() {
        let fx = fixture();
        let client = sample_client();
        let code = seed_code(&fx, &client).await;
        let issued = fx.service.grant(&client, code_grant(&code)).await.unwrap();
        fx.service
            .revoke(&client, &issued.access_token, None)
            .await
            .unwrap();

        let revoked = fx.service.introspect(&issued.access_token).await.unwrap();
        let unknown = fx.service.introspect("never-issued").await.unwrap();
        assert_eq!(
            serde_json::to_value(&revoked).unwrap(),
            serde_json::to_value(&unknown).unwrap()
        );
    }

    #[tokio::test]
    async fn test_grant_type_not_registered_for_client() {
        let fx = fixture();
        let mut client = sample_client();
        client.grant_types = vec![GrantType::AuthorizationCode];

        let err = fx
            .service
            .grant(
                &client,
                GrantRequest::RefreshToken {
                    refresh_token: "rt".to_string(),
                    scope: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedGrantType { .. }));
    }
}
