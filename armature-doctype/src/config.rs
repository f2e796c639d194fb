//! Client configuration.

use std::time::Duration;

/// Client configuration shared by every index and type handle.
#[derive(Debug, Clone)]
pub struct OpenSearchConfig {
    /// OpenSearch URL(s).
    pub urls: Vec<String>,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Assign server-generated ids to documents added without one.
    ///
    /// Types copy this value when they are created; a document can still
    /// override it for a single call.
    pub auto_populate: bool,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self::new("http://localhost:9200")
    }
}

impl OpenSearchConfig {
    /// Create a new configuration with a single URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            auto_populate: false,
        }
    }

    /// Create configuration with multiple URLs for a cluster.
    pub fn cluster(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Self::new("")
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `OPENSEARCH_URL`, `OPENSEARCH_USERNAME`, `OPENSEARCH_PASSWORD`,
    /// `OPENSEARCH_REQUEST_TIMEOUT_SECS` and `OPENSEARCH_AUTO_POPULATE`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let urls = std::env::var("OPENSEARCH_URL")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|urls| !urls.is_empty())
            .unwrap_or(defaults.urls);

        Self {
            urls,
            username: std::env::var("OPENSEARCH_USERNAME").ok(),
            password: std::env::var("OPENSEARCH_PASSWORD").ok(),
            request_timeout: std::env::var("OPENSEARCH_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            auto_populate: std::env::var("OPENSEARCH_AUTO_POPULATE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.auto_populate),
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable id auto-population for new types.
    pub fn with_auto_populate(mut self, enabled: bool) -> Self {
        self.auto_populate = enabled;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
