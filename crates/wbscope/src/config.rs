//! Endpoint and limit configuration.

use std::time::Duration;

use crate::shard::CDN_DOMAIN;

/// Catalog search endpoint.
pub const SEARCH_URL: &str = "https://search.wb.ru/exactmatch/ru/common/v18/search";

/// Analytics products endpoint.
pub const ANALYTICS_URL: &str = "https://app.mayak.bz/api/v1/wb/products";

/// Most identifiers the analytics API accepts in one request.
pub const MAX_CODES_PER_REQUEST: usize = 20;

/// Default delivery region code sent to the catalog.
pub const DEFAULT_DEST: &str = "12358327";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the search and analytics clients.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub search_url: String,
    pub analytics_url: String,
    pub cdn_domain: String,
    /// Delivery region code (`dest` query parameter).
    pub dest: String,
    pub timeout: Duration,
    pub chunk_size: usize,
    /// Pause between analytics chunk requests.
    pub chunk_pause: Duration,
    pub user_agent: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            search_url: SEARCH_URL.to_string(),
            analytics_url: ANALYTICS_URL.to_string(),
            cdn_domain: CDN_DOMAIN.to_string(),
            dest: DEFAULT_DEST.to_string(),
            timeout: DEFAULT_TIMEOUT,
            chunk_size: MAX_CODES_PER_REQUEST,
            chunk_pause: Duration::ZERO,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl ScoutConfig {
    /// Defaults overridden by `WBSCOPE_*` environment variables.
    ///
    /// Unparseable numeric values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `WBSCOPE_*` key.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut config = Self::default();
        if let Some(v) = value("WBSCOPE_SEARCH_URL") {
            config.search_url = v;
        }
        if let Some(v) = value("WBSCOPE_ANALYTICS_URL") {
            config.analytics_url = v;
        }
        if let Some(v) = value("WBSCOPE_CDN_DOMAIN") {
            config.cdn_domain = v;
        }
        if let Some(v) = value("WBSCOPE_DEST") {
            config.dest = v;
        }
        if let Some(secs) = value("WBSCOPE_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = value("WBSCOPE_CHUNK_PAUSE_MS").and_then(|v| v.parse::<u64>().ok()) {
            config.chunk_pause = Duration::from_millis(ms);
        }
        config
    }

    /// Point both clients at a different host, keeping the endpoint paths.
    ///
    /// Used by tests to aim the clients at a local mock server.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.search_url = format!("{base}/exactmatch/ru/common/v18/search");
        self.analytics_url = format!("{base}/api/v1/wb/products");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ScoutConfig::from_lookup(lookup(&[
            ("WBSCOPE_SEARCH_URL", "http://search.local/s"),
            ("WBSCOPE_ANALYTICS_URL", " http://mayak.local/p "),
            ("WBSCOPE_CDN_DOMAIN", "cdn.local"),
            ("WBSCOPE_DEST", "-1257786"),
            ("WBSCOPE_TIMEOUT_SECS", "7"),
            ("WBSCOPE_CHUNK_PAUSE_MS", "250"),
        ]));
        assert_eq!(config.search_url, "http://search.local/s");
        assert_eq!(config.analytics_url, "http://mayak.local/p");
        assert_eq!(config.cdn_domain, "cdn.local");
        assert_eq!(config.dest, "-1257786");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.chunk_pause, Duration::from_millis(250));
    }

    #[test]
    fn test_from_lookup_ignores_bad_values() {
        let config = ScoutConfig::from_lookup(lookup(&[
            ("WBSCOPE_SEARCH_URL", "   "),
            ("WBSCOPE_TIMEOUT_SECS", "soon"),
            ("WBSCOPE_CHUNK_PAUSE_MS", "-5"),
        ]));
        assert_eq!(config.search_url, SEARCH_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.chunk_pause, Duration::ZERO);
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = ScoutConfig::from_lookup(lookup(&[("WBSCOPE_TIMEOUT_SECS", "0")]));
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::default();
        assert_eq!(config.chunk_size, 20);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cdn_domain, "wbbasket.ru");
        assert_eq!(config.dest, "12358327");
    }

    #[test]
    fn test_with_base_url() {
        let config = ScoutConfig::default().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.search_url,
            "http://127.0.0.1:9000/exactmatch/ru/common/v18/search"
        );
        assert_eq!(config.analytics_url, "http://127.0.0.1:9000/api/v1/wb/products");
    }
}
