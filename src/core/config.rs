//! Process configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::core::client::is_placeholder_key;

/// Environment variable holding the news provider key.
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";
/// Overrides the news provider base URL.
pub const ENV_NEWS_API_BASE: &str = "NEWS_API_BASE";
/// Path of the exported classifier artifact.
pub const ENV_MODEL_PATH: &str = "RISKPULSE_MODEL";
/// `0`/`false`/`off` disables feature attribution.
pub const ENV_ATTRIBUTION: &str = "RISKPULSE_ATTRIBUTION";
/// Overall deadline of the news branch, in seconds.
pub const ENV_NEWS_TIMEOUT_SECS: &str = "RISKPULSE_NEWS_TIMEOUT_SECS";

const DEFAULT_MODEL_PATH: &str = "model_lr.json";
const DEFAULT_NEWS_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the command-line entry point.
#[derive(Debug, Clone)]
pub struct Settings {
    /// A usable news key, or `None` when absent or an obvious placeholder.
    pub news_api_key: Option<String>,
    /// Alternate news endpoint, mainly for tests.
    pub news_api_base: Option<Url>,
    pub model_path: PathBuf,
    pub include_attribution: bool,
    pub news_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_base: None,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            include_attribution: true,
            news_timeout: Duration::from_secs(DEFAULT_NEWS_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Never fails: unusable
    /// values fall back to defaults with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let news_api_key = match lookup(ENV_NEWS_API_KEY) {
            Some(k) if !is_placeholder_key(&k) => Some(k.trim().to_string()),
            Some(_) => {
                tracing::warn!("{ENV_NEWS_API_KEY} looks like a placeholder; news sentiment disabled");
                None
            }
            None => {
                tracing::warn!("{ENV_NEWS_API_KEY} not set; news sentiment disabled");
                None
            }
        };

        let news_api_base = lookup(ENV_NEWS_API_BASE).and_then(|raw| match Url::parse(&raw) {
            Ok(u) => Some(u),
            Err(e) => {
                tracing::warn!("ignoring {ENV_NEWS_API_BASE}={raw:?}: {e}");
                None
            }
        });

        let include_attribution = lookup(ENV_ATTRIBUTION).is_none_or(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            )
        });

        let news_timeout = lookup(ENV_NEWS_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map_or(defaults.news_timeout, Duration::from_secs);

        Self {
            news_api_key,
            news_api_base,
            model_path: lookup(ENV_MODEL_PATH).map_or(defaults.model_path, PathBuf::from),
            include_attribution,
            news_timeout,
        }
    }
}
