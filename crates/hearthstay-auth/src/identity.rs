//! Resource owner identity resolution for the authorization endpoint.
//!
//! End-user login and consent UX are outside this crate. Deployments
//! sit behind a trusted gateway or session layer and plug in a
//! [`SubjectProvider`] that maps an incoming request to the
//! authenticated subject, if any.

use async_trait::async_trait;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::error::AuthError;

/// Resolves the authenticated resource owner for an authorization
/// request.
#[async_trait]
pub trait SubjectProvider: Send + Sync {
    /// Returns the authenticated subject for the request, or `None`
    /// when the request carries no authenticated user.
    async fn current_subject(&self, headers: &HeaderMap) -> Result<Option<Uuid>, AuthError>;
}

/// A provider that always returns the same subject.
///
/// Useful behind a gateway that has already authenticated the user, and
/// in tests.
#[derive(Debug, Clone)]
pub struct StaticSubjectProvider {
    subject: Option<Uuid>,
}

impl StaticSubjectProvider {
    /// Creates a provider that reports the given subject.
    #[must_use]
    pub fn new(subject: Uuid) -> Self {
        Self {
            subject: Some(subject),
        }
    }

    /// Creates a provider that reports no authenticated user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { subject: None }
    }
}

#[async_trait]
impl SubjectProvider for StaticSubjectProvider {
    async fn current_subject(&self, _headers: &HeaderMap) -> Result<Option<Uuid>, AuthError> {
        Ok(self.subject)
    }
}
