//! Authenticated HTTP client for the feed-reading API.
//!
//! All outgoing calls go through [`ApiClient`], the single point of egress.
//! The client is handed a [`CredentialSource`] at construction and consults
//! it again on every request, so a login or logout takes effect immediately
//! for subsequent calls without rebuilding the client.

pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use url::Url;

use types::{Feed, LoginRequest, Post, TokenResponse, User};

/// Capability providing the current bearer credential, if any.
///
/// Keeps the storage mechanism out of the request path: the client only
/// knows how to ask for "the current credential", making the coupling
/// explicit and substitutable in tests.
pub trait CredentialSource: Send + Sync {
    /// Returns the current bearer token. A failed read is reported as
    /// `None` and never fails the request.
    fn current(&self) -> Option<String>;
}

/// HTTP client for the feed-reading API.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialSource>,
}

impl ApiClient {
    /// Creates a new client against `base_url`.
    ///
    /// The base URL must end with a slash for relative path joins.
    pub fn new(base_url: Url, credentials: Arc<dyn CredentialSource>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Builds a request for `path`, attaching `Authorization: Bearer <token>`
    /// when a credential is available. The source is re-read per call so the
    /// request always reflects the latest persisted credential.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("Invalid API path: {path}"))?;

        let mut request = self.http.request(method, url);
        if let Some(token) = self.credentials.current() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Exchanges login credentials for a bearer token.
    ///
    /// Returns `Ok(None)` when the server rejects the credentials or the
    /// response carries no usable token; only transport failures are errors.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Option<String>> {
        let response = self
            .request(Method::POST, "v1/users/login")?
            .json(credentials)
            .send()
            .await
            .context("Login request failed")?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "login rejected");
            return Ok(None);
        }

        let payload: TokenResponse = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(%err, "login response carried no usable token");
                return Ok(None);
            }
        };

        Ok((!payload.token.is_empty()).then_some(payload.token))
    }

    /// Fetches the profile of the currently authenticated user.
    ///
    /// The success criterion is HTTP 200; any other status yields `Ok(None)`.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let response = self
            .request(Method::GET, "v1/users")?
            .send()
            .await
            .context("Profile request failed")?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), "profile fetch rejected");
            return Ok(None);
        }

        let user = response
            .json::<User>()
            .await
            .context("Failed to parse user profile")?;
        Ok(Some(user))
    }

    /// Lists aggregated posts for the authenticated user.
    ///
    /// Ordering and pagination semantics are defined by the server. The
    /// server answers 404 for an empty page; that maps to an empty list.
    pub async fn posts(&self, page_size: u32) -> Result<Vec<Post>> {
        let response = self
            .request(Method::GET, "v1/posts")?
            .query(&[("pageSize", page_size)])
            .send()
            .await
            .context("Posts request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let status = response.status();
        if !status.is_success() {
            bail!(
                "posts request failed with status {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
        }

        response
            .json()
            .await
            .context("Failed to parse posts response")
    }

    /// Registers a new feed source by URL.
    ///
    /// No local URL validation; any validation is the server's
    /// responsibility. The acknowledgement shape is not constrained.
    pub async fn add_feed(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .request(Method::POST, "v1/feeds")?
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .context("Feed registration failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "feed registration failed with status {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
        }

        // Empty acknowledgement bodies are tolerated.
        Ok(response.json().await.unwrap_or_default())
    }

    /// Lists registered feed sources (public listing).
    ///
    /// As with posts, the server answers 404 for an empty page.
    pub async fn feeds(&self, page_size: u32) -> Result<Vec<Feed>> {
        let response = self
            .request(Method::GET, "v1/feeds")?
            .query(&[("pageSize", page_size)])
            .send()
            .await
            .context("Feeds request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let status = response.status();
        if !status.is_success() {
            bail!(
                "feeds request failed with status {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
        }

        response
            .json()
            .await
            .context("Failed to parse feeds response")
    }
}
