//! Single-admin authorization policy.

use async_trait::async_trait;
use currency_atlas_core::auth::Authenticator;
use currency_atlas_core::error::DomainError;

/// Grants write access to exactly one configured email address.
/// Comparison ignores surrounding whitespace and ASCII case.
#[derive(Debug, Clone)]
pub struct AdminAuthenticator {
    admin_email: String,
}

impl AdminAuthenticator {
    /// Creates an authenticator for `admin_email`.
    #[must_use]
    pub fn new(admin_email: &str) -> Self {
        Self {
            admin_email: admin_email.trim().to_ascii_lowercase(),
        }
    }
}

#[async_trait]
impl Authenticator for AdminAuthenticator {
    async fn is_admin(&self, actor: &str) -> Result<bool, DomainError> {
        Ok(!self.admin_email.is_empty() && actor.trim().eq_ignore_ascii_case(&self.admin_email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_email_matches_case_insensitively() {
        let auth = AdminAuthenticator::new("Admin@Example.com");

        assert!(auth.is_admin(" admin@example.COM ").await.unwrap());
    }

    #[tokio::test]
    async fn test_other_identities_are_not_admin() {
        let auth = AdminAuthenticator::new("admin@example.com");

        assert!(!auth.is_admin("editor@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_admin_email_admits_nobody() {
        let auth = AdminAuthenticator::new("");

        assert!(!auth.is_admin("").await.unwrap());
    }
}
