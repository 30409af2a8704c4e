//! Wire types for the feed-reading API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side account profile, cached client-side after login.
///
/// Read-only on the client: set on successful login, cleared on logout,
/// never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credentials submitted for the login exchange. Never persisted.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload of a successful login exchange.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub token: String,
}

/// A single aggregated post. Opaque pass-through payload; unknown response
/// fields are ignored and no client-side invariants are enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub url: String,
    /// Source/author label of the feed the post came from.
    #[serde(default)]
    pub name: String,
}

/// A registered feed source, as returned by the public feed listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub name: String,
    pub url: String,
}
