use std::time::Duration;

use reqwest::Url;

use crate::{ApiError, Result};

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ENV_BASE_URL: &str = "AGRIMARKET_API_URL";
pub const ENV_TIMEOUT_MS: &str = "AGRIMARKET_API_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "AGRIMARKET_API_MAX_RETRIES";
pub const ENV_BACKOFF_MS: &str = "AGRIMARKET_API_BACKOFF_MS";

/// Configures base URL, HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Base URL every endpoint is resolved against.
    pub base_url: String,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of attempts per logical call, the first one included.
    pub max_attempts: u32,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: 10_000,
            max_attempts: 3,
            retry_backoff_ms: 1_000,
        }
    }
}

impl ClientOptions {
    /// Reads options from the process environment.
    ///
    /// Reads:
    /// - `AGRIMARKET_API_URL` — base URL (default `http://localhost:8000`)
    /// - `AGRIMARKET_API_TIMEOUT_MS` — per-attempt timeout (default `10000`)
    /// - `AGRIMARKET_API_MAX_RETRIES` — maximum attempts (default `3`)
    /// - `AGRIMARKET_API_BACKOFF_MS` — backoff base (default `1000`)
    ///
    /// Unset or blank variables fall back to the default.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientOptions::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Ok(Self {
            base_url: read(ENV_BASE_URL).unwrap_or(defaults.base_url),
            timeout_ms: parse_number(ENV_TIMEOUT_MS, read(ENV_TIMEOUT_MS))?
                .unwrap_or(defaults.timeout_ms),
            max_attempts: parse_number(ENV_MAX_RETRIES, read(ENV_MAX_RETRIES))?
                .unwrap_or(defaults.max_attempts),
            retry_backoff_ms: parse_number(ENV_BACKOFF_MS, read(ENV_BACKOFF_MS))?
                .unwrap_or(defaults.retry_backoff_ms),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// Example: base `"http://host/"` + `"api/farmers"` → `"http://host/api/farmers"`
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Resolves an endpoint and appends `segments`, each percent-encoded as
    /// a single path segment.
    pub fn resolve_url<S: AsRef<str>>(&self, endpoint: &str, segments: &[S]) -> Result<Url> {
        let raw = self.endpoint_url(endpoint);
        let mut url = Url::parse(&raw)
            .map_err(|err| ApiError::InvalidRequest(format!("url '{raw}': {err}")))?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ApiError::InvalidRequest(format!("url '{raw}' cannot have a path")))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    /// Delay to wait after failed attempt number `attempt` (1-indexed).
    ///
    /// `retry_backoff_ms * 2^attempt`: 2s, 4s, 8s, ... with the defaults.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.min(16);
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(multiplier))
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, value: Option<String>) -> Result<Option<N>> {
    value
        .map(|raw| {
            raw.parse::<N>()
                .map_err(|_| ApiError::Config(format!("{key} must be a number, got '{raw}'")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::{ClientOptions, ENV_BASE_URL, ENV_MAX_RETRIES, ENV_TIMEOUT_MS};
    use crate::ApiError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_backend_conventions() {
        let opts = ClientOptions::default();
        assert_eq!(opts.base_url, "http://localhost:8000");
        assert_eq!(opts.timeout_ms, 10_000);
        assert_eq!(opts.max_attempts, 3);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let opts = ClientOptions::default();
        assert_eq!(opts.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(opts.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(opts.backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn endpoint_url_joins_slashes_once() {
        let opts = ClientOptions::default().with_base_url("http://api.test/");
        assert_eq!(opts.endpoint_url("/api/farmers"), "http://api.test/api/farmers");
        assert_eq!(opts.endpoint_url("api/farmers"), "http://api.test/api/farmers");
    }

    #[test]
    fn resolve_url_encodes_each_segment_verbatim() {
        let opts = ClientOptions::default().with_base_url("http://api.test/v1/");
        let url = opts
            .resolve_url("/api/statistics/regional", &["Rift Valley"])
            .expect("valid url must resolve");
        assert_eq!(
            url.as_str(),
            "http://api.test/v1/api/statistics/regional/Rift%20Valley"
        );

        let url = opts
            .resolve_url("/api/statistics/regional", &[" north "])
            .expect("valid url must resolve");
        assert!(url.as_str().ends_with("/regional/%20north%20"));

        let url = opts
            .resolve_url("/api/statistics/regional/", &["a/b"])
            .expect("valid url must resolve");
        assert!(url.as_str().ends_with("/regional/a%2Fb"));
    }

    #[test]
    fn resolve_url_rejects_unparsable_base() {
        let opts = ClientOptions::default().with_base_url("not a url");
        let err = opts
            .resolve_url::<&str>("/api/farmers", &[])
            .expect_err("relative base must fail");
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn from_lookup_reads_overrides_and_ignores_blank() {
        let opts = ClientOptions::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://market.example"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_MAX_RETRIES, "  "),
        ]))
        .expect("valid env must parse");

        assert_eq!(opts.base_url, "https://market.example");
        assert_eq!(opts.timeout_ms, 2_500);
        assert_eq!(opts.max_attempts, 3);
    }

    #[test]
    fn from_lookup_rejects_non_numeric_timeout() {
        let err = ClientOptions::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")]))
            .expect_err("non-numeric timeout must fail");
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn zero_attempts_still_makes_one_call() {
        let opts = ClientOptions {
            max_attempts: 0,
            ..ClientOptions::default()
        };
        assert_eq!(opts.attempts(), 1);
    }
}
