//! Bilibili API client for identity and follower statistics lookups
//!
//! Two endpoints are used: `x/space/acc/info` to resolve a UID to its display
//! name, and `x/relation/stat` to read the current follower count. Both are
//! public, unauthenticated GETs sent with browser-like headers. The client
//! never retries; callers decide what a failure means.

use crate::error::{FwatchError, Result};
use crate::types::Uid;
use reqwest::{header, Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Desktop Chrome user agent; the API rejects obviously scripted clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for the Bilibili API client
#[derive(Debug, Clone)]
pub struct BiliConfig {
    /// Base URL of the API host (e.g., "https://api.bilibili.com")
    pub api_base_url: String,
    /// Base URL of the profile pages, used to build the Referer header
    pub space_base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Identity lookup timeout in seconds (default: 10)
    pub identity_timeout_secs: u64,
    /// Statistics lookup timeout in seconds (default: 15)
    pub stats_timeout_secs: u64,
}

impl Default for BiliConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.bilibili.com".to_string(),
            space_base_url: "https://space.bilibili.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            identity_timeout_secs: 10,
            stats_timeout_secs: 15,
        }
    }
}

impl BiliConfig {
    /// Create a configuration pointing at a different API host
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Set the profile page base used for the Referer header
    pub fn with_space_base(mut self, space_base_url: impl Into<String>) -> Self {
        self.space_base_url = space_base_url.into();
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set both request timeouts
    pub fn with_timeouts(mut self, identity_secs: u64, stats_secs: u64) -> Self {
        self.identity_timeout_secs = identity_secs;
        self.stats_timeout_secs = stats_secs;
        self
    }
}

/// Bilibili API client
#[derive(Debug, Clone)]
pub struct BiliClient {
    client: Client,
    config: BiliConfig,
}

impl BiliClient {
    /// Create a new client with the given configuration
    pub fn new(config: BiliConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/plain, */*"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FwatchError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(BiliConfig::default())
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &BiliConfig {
        &self.config
    }

    /// URL of the identity endpoint for `uid`
    pub fn identity_url(&self, uid: &Uid) -> String {
        format!(
            "{}/x/space/acc/info?mid={}",
            self.config.api_base_url.trim_end_matches('/'),
            uid
        )
    }

    /// URL of the follower statistics endpoint for `uid`
    pub fn stats_url(&self, uid: &Uid) -> String {
        format!(
            "{}/x/relation/stat?vmid={}",
            self.config.api_base_url.trim_end_matches('/'),
            uid
        )
    }

    /// Referer header value for requests about `uid`
    pub fn referer(&self, uid: &Uid) -> String {
        format!("{}/{}/", self.config.space_base_url.trim_end_matches('/'), uid)
    }

    /// Send a request and decode the JSON envelope.
    ///
    /// The platform answers some rejections with a non-2xx status and a
    /// regular envelope, so the body is decoded first. The status only
    /// becomes the error when the body is not an envelope.
    async fn request_envelope<T>(&self, request: RequestBuilder) -> Result<ApiEnvelope<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        let status_error = response.error_for_status_ref().err();
        let text = response
            .text()
            .await
            .map_err(|e| FwatchError::network_with_source("Failed to read response body", e))?;

        debug!("Response body: {}", text);
        match serde_json::from_str(&text) {
            Ok(envelope) => Ok(envelope),
            Err(e) => match status_error {
                Some(status_error) => Err(status_error.into()),
                None => Err(e.into()),
            },
        }
    }

    /// Resolve a UID to its display name.
    ///
    /// Returns `None` when the name cannot be resolved for any reason:
    /// transport failure, non-zero result code, malformed or nameless payload.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn resolve_name(&self, uid: &Uid) -> Option<String> {
        let request = self
            .client
            .get(self.identity_url(uid))
            .timeout(Duration::from_secs(self.config.identity_timeout_secs));

        match self.request_envelope::<IdentityData>(request).await {
            Ok(envelope) => match envelope.into_data() {
                Ok(data) => data.name.filter(|name| !name.trim().is_empty()),
                Err(e) => {
                    warn!("Identity lookup rejected: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Identity lookup failed: {}", e);
                None
            }
        }
    }

    /// Fetch the current follower count for a UID.
    ///
    /// A non-zero result code becomes [`FwatchError::Api`]; transport and
    /// decoding failures become network or serialization errors.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn follower_count(&self, uid: &Uid) -> Result<u64> {
        let request = self
            .client
            .get(self.stats_url(uid))
            .header(header::REFERER, self.referer(uid))
            .timeout(Duration::from_secs(self.config.stats_timeout_secs));

        let envelope: ApiEnvelope<RelationStat> = self.request_envelope(request).await?;
        Ok(envelope.into_data()?.follower)
    }
}

// ============================================================================
// API Response Models
// ============================================================================

/// Response wrapper shared by every endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    /// Result code, zero on success
    pub code: i64,
    /// Human readable status ("0" or an error description)
    #[serde(default)]
    pub message: String,
    /// The actual payload; absent or null on errors
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Take the payload, mapping error codes and missing data to errors
    pub fn into_data(self) -> Result<T> {
        if !self.is_success() {
            let message = if self.message.is_empty() {
                "unknown error".to_string()
            } else {
                self.message
            };
            return Err(FwatchError::api(self.code, message));
        }
        self.data
            .ok_or_else(|| FwatchError::api(self.code, "response contained no data"))
    }
}

/// Payload of `x/space/acc/info`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityData {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload of `x/relation/stat`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelationStat {
    /// Account the statistics belong to
    #[serde(default)]
    pub mid: Option<u64>,
    /// Number of accounts this account follows
    #[serde(default)]
    pub following: Option<u64>,
    /// Number of followers
    pub follower: u64,
}
