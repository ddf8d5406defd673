//! Authorization abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Answers whether a caller identity may write to the registry.
///
/// Implementations may call out to an identity provider; a transport failure
/// is returned as an error rather than as `false`.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns `true` when `actor` is the admin identity.
    async fn is_admin(&self, actor: &str) -> Result<bool, DomainError>;
}
