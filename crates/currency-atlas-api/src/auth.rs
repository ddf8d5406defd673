//! Credential login and bearer-token sessions.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use currency_atlas_core::clock::Clock;

use crate::state::AppState;

/// The configured admin login. Only a digest of the password is kept.
pub struct AdminCredentials {
    email: String,
    password_digest: Vec<u8>,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn digest(password: &str) -> Vec<u8> {
    Sha256::digest(password.as_bytes()).to_vec()
}

impl AdminCredentials {
    /// Creates credentials for `email` with `password`.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password_digest: digest(password),
        }
    }

    /// The normalized admin email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether `email`/`password` match. The email is compared
    /// case-insensitively; an empty configured email never matches.
    #[must_use]
    pub fn verify(&self, email: &str, password: &str) -> bool {
        !self.email.is_empty()
            && email.trim().to_lowercase() == self.email
            && digest(password) == self.password_digest
    }
}

/// One signed-in admin and when they signed in.
#[derive(Debug, Clone)]
struct Session {
    email: String,
    issued_at: DateTime<Utc>,
}

/// Opaque session tokens mapped to the signed-in email. Tokens stop
/// resolving once `ttl` has passed since they were issued.
pub struct SessionRegistry {
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    sessions: RwLock<HashMap<String, Session>>,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("SessionRegistry")
            .field("ttl", &self.ttl)
            .field("sessions", &count)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions last `ttl`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            clock,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.issued_at < self.ttl
    }

    /// Starts a session for `email` and returns its token. Expired sessions
    /// are dropped on the way.
    pub fn issue(&self, email: &str) -> String {
        let now = self.clock.now();
        let token = Uuid::new_v4().to_string();
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| self.is_live(session, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "dropped expired sessions");
        }
        sessions.insert(
            token.clone(),
            Session {
                email: email.to_owned(),
                issued_at: now,
            },
        );
        token
    }

    /// The email signed in under `token`, if the session exists and has not
    /// expired.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<String> {
        let now = self.clock.now();
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .filter(|session| self.is_live(session, now))
            .map(|session| session.email.clone())
    }

    /// Ends the session for `token`. Returns whether a live one existed.
    pub fn revoke(&self, token: &str) -> bool {
        let now = self.clock.now();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some_and(|session| self.is_live(&session, now))
    }

    /// Number of stored sessions, expired ones included until pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts the bearer token from the `Authorization` header.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The signed-in caller, or `None` when the request carries no valid session.
///
/// Never rejects: deciding whether an anonymous caller may proceed is left to
/// the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub Option<String>);

impl FromRequestParts<AppState> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(
            bearer_token(parts).and_then(|token| state.sessions.resolve(token)),
        ))
    }
}

/// The raw bearer token of the request, if present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(bearer_token(parts).map(str::to_owned)))
    }
}
