//! Public client surface + builder for the news provider.
//! Defaults (UA, base URL, timeout, placeholder keys) live in `constants`.

mod constants;

use crate::core::RiskError;
use constants::{
    DEFAULT_BASE_NEWS, DEFAULT_TIMEOUT_SECS, MIN_KEY_LEN, PLACEHOLDER_KEYS, USER_AGENT,
};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Returns `true` for keys that are obviously not real credentials
/// (empty, too short, `PUT_...` templates, or known sample keys).
#[must_use]
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.len() < MIN_KEY_LEN
        || key.starts_with("PUT_")
        || PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(key))
}

/// Thin wrapper that holds a configured HTTP client, base URL and credential.
#[derive(Clone)]
pub struct NewsClient {
    http: Client,
    base_news: Url,
    api_key: String,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tail = self
            .api_key
            .get(self.api_key.len().saturating_sub(4)..)
            .unwrap_or_default();
        f.debug_struct("NewsClient")
            .field("base_news", &self.base_news.as_str())
            .field("api_key", &format_args!("...{tail}"))
            .finish_non_exhaustive()
    }
}

impl NewsClient {
    /// Create a new builder.
    pub fn builder() -> NewsClientBuilder {
        NewsClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn base_news(&self) -> &Url {
        &self.base_news
    }
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct NewsClientBuilder {
    api_key: Option<String>,
    user_agent: Option<String>,
    base_news: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl NewsClientBuilder {
    /// Set the provider API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the API base (e.g., `https://newsapi.org/v2/`).
    pub fn base_news(mut self, url: Url) -> Self {
        self.base_news = Some(url);
        self
    }

    /// Set the overall request timeout. Default: 10 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidInput`] if no usable API key was given, or an
    /// HTTP/URL error if the underlying client cannot be constructed.
    pub fn build(self) -> Result<NewsClient, RiskError> {
        let api_key = self
            .api_key
            .filter(|k| !is_placeholder_key(k))
            .ok_or_else(|| RiskError::InvalidInput("missing or placeholder news API key".into()))?;

        let mut base_news = self.base_news.unwrap_or(Url::parse(DEFAULT_BASE_NEWS)?);
        // `Url::join` drops the last segment unless the base ends with '/'.
        if !base_news.path().ends_with('/') {
            let path = format!("{}/", base_news.path());
            base_news.set_path(&path);
        }

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            );
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        Ok(NewsClient {
            http: httpb.build()?,
            base_news,
            api_key: api_key.trim().to_string(),
        })
    }
}
