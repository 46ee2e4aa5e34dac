//! Connection settings for the platform APIs.

/// Default base URL of the compute (management) API.
pub const DEFAULT_COMPUTE_URL: &str = "https://compute.cplane.cloud/v1";

/// Default base URL of the identity API used for token exchange.
pub const DEFAULT_IDENTITY_URL: &str = "https://flightdeck.cplane.cloud/identity";

/// Everything the client needs to reach the platform. Captured once at
/// construction time; the client holds no other state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the compute API, without a trailing slash.
    pub compute_url: String,
    /// Base URL of the identity API, without a trailing slash.
    pub identity_url: String,
    /// Long-lived API key exchanged for short-lived access tokens.
    pub api_key: String,
}

impl Config {
    /// A configuration pointing at the hosted platform endpoints.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            compute_url: DEFAULT_COMPUTE_URL.to_string(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the compute API base URL. Used for self-hosted installs and
    /// in tests against a mock server.
    #[must_use]
    pub fn with_compute_url<S: AsRef<str>>(mut self, url: S) -> Self {
        self.compute_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Override the identity API base URL.
    #[must_use]
    pub fn with_identity_url<S: AsRef<str>>(mut self, url: S) -> Self {
        self.identity_url = url.as_ref().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_normalized() {
        let config = Config::new("key")
            .with_compute_url("http://localhost:8080/v1/")
            .with_identity_url("http://localhost:8080/identity/");
        assert_eq!(config.compute_url, "http://localhost:8080/v1");
        assert_eq!(config.identity_url, "http://localhost:8080/identity");
    }
}
