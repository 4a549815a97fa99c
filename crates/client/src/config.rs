use std::time::Duration;

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:3000`.
    pub api_url: String,
    /// Per-request timeout in seconds (default: `15`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            request_timeout_secs: 15,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `ROCKETLAB_API_URL`              | `http://localhost:3000` |
    /// | `ROCKETLAB_REQUEST_TIMEOUT_SECS` | `15`                    |
    pub fn from_env() -> Self {
        let api_url = std::env::var("ROCKETLAB_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let request_timeout_secs: u64 = std::env::var("ROCKETLAB_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("ROCKETLAB_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            request_timeout_secs,
            ..Self::new(api_url)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
