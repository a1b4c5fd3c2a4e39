//! Centralized constants for default endpoints and UA.

/// Identifies this crate to the news provider.
pub(crate) const USER_AGENT: &str = concat!("riskpulse/", env!("CARGO_PKG_VERSION"));

/// NewsAPI v2 base (endpoint path is appended).
pub(crate) const DEFAULT_BASE_NEWS: &str = "https://newsapi.org/v2/";

/// Overall deadline for a single news request.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Keys shipped in sample configs and docs; treated as "no key".
pub(crate) const PLACEHOLDER_KEYS: &[&str] = &[
    "your_actual_api_key_here",
    "your_api_key",
    "changeme",
    "8a7653142e2f47f291ebcc0da8fd219d",
];

/// Shortest string accepted as a real API key.
pub(crate) const MIN_KEY_LEN: usize = 10;
