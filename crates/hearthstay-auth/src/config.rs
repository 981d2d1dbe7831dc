//! Configuration types for the authorization server.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authorization server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer identifier included in introspection responses.
    pub issuer: String,

    /// Lifetime of authorization codes.
    #[serde(with = "humantime_serde")]
    pub code_lifetime: Duration,

    /// Default lifetime of access tokens. Clients may override with a
    /// shorter per-client value.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Default lifetime of refresh tokens.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://auth.hearthstay.local".to_string(),
            code_lifetime: Duration::from_secs(600),
            access_token_lifetime: Duration::from_secs(3600),
            refresh_token_lifetime: Duration::from_secs(30 * 24 * 3600),
        }
    }
}

impl AuthConfig {
    /// Creates a configuration with the given issuer and default lifetimes.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Self::default()
        }
    }

    /// Sets the authorization code lifetime.
    #[must_use]
    pub fn with_code_lifetime(mut self, lifetime: Duration) -> Self {
        self.code_lifetime = lifetime;
        self
    }

    /// Sets the default access token lifetime.
    #[must_use]
    pub fn with_access_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_token_lifetime = lifetime;
        self
    }

    /// Sets the default refresh token lifetime.
    #[must_use]
    pub fn with_refresh_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.refresh_token_lifetime = lifetime;
        self
    }

    /// Authorization code lifetime as a `time::Duration`.
    #[must_use]
    pub fn code_duration(&self) -> time::Duration {
        time::Duration::seconds(self.code_lifetime.as_secs() as i64)
    }

    /// Access token lifetime as a `time::Duration`.
    #[must_use]
    pub fn access_token_duration(&self) -> time::Duration {
        time::Duration::seconds(self.access_token_lifetime.as_secs() as i64)
    }

    /// Refresh token lifetime as a `time::Duration`.
    #[must_use]
    pub fn refresh_token_duration(&self) -> time::Duration {
        time::Duration::seconds(self.refresh_token_lifetime.as_secs() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.code_lifetime, Duration::from_secs(600));
        assert_eq!(config.access_token_lifetime, Duration::from_secs(3600));
        assert_eq!(
            config.refresh_token_lifetime,
            Duration::from_secs(30 * 24 * 3600)
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = AuthConfig::new("https://auth.example.com")
            .with_code_lifetime(Duration::from_secs(120))
            .with_access_token_lifetime(Duration::from_secs(900));

        assert_eq!(config.issuer, "https://auth.example.com");
        assert_eq!(config.code_lifetime, Duration::from_secs(120));
        assert_eq!(config.access_token_lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_deserialize_humantime() {
        let toml = r#"
            issuer = "https://auth.example.com"
            code_lifetime = "5m"
            access_token_lifetime = "15m"
            refresh_token_lifetime = "7d"
        "#;
        let config: AuthConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.code_lifetime, Duration::from_secs(300));
        assert_eq!(config.access_token_lifetime, Duration::from_secs(900));
        assert_eq!(config.refresh_token_lifetime, Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_time_duration_conversion() {
        let config = AuthConfig::default();
        assert_eq!(config.code_duration(), time::Duration::minutes(10));
        assert_eq!(config.access_token_duration(), time::Duration::hours(1));
    }
}
