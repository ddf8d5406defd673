//! Test authenticators.

use async_trait::async_trait;
use currency_atlas_core::auth::Authenticator;
use currency_atlas_core::error::DomainError;

/// Treats exactly one identity as the admin.
#[derive(Debug, Clone)]
pub struct SingleUserAuthenticator(pub String);

#[async_trait]
impl Authenticator for SingleUserAuthenticator {
    async fn is_admin(&self, actor: &str) -> Result<bool, DomainError> {
        Ok(actor == self.0)
    }
}

/// Rejects every caller.
#[derive(Debug)]
pub struct DenyAllAuthenticator;

#[async_trait]
impl Authenticator for DenyAllAuthenticator {
    async fn is_admin(&self, _actor: &str) -> Result<bool, DomainError> {
        Ok(false)
    }
}

/// Fails as if the identity provider were unreachable.
#[derive(Debug)]
pub struct FailingAuthenticator;

#[async_trait]
impl Authenticator for FailingAuthenticator {
    async fn is_admin(&self, _actor: &str) -> Result<bool, DomainError> {
        Err(DomainError::Unauthorized("identity provider unreachable".into()))
    }
}
