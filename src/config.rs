//! Adapter configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Each external collaborator gets its own config struct with a `from_env`
//! constructor. Missing required variables disable the adapter (`None`)
//! rather than panicking; the shell decides whether that is fatal.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Identity provider endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base URL of the identity service, no trailing slash.
    pub base_url: String,
    /// Project API key sent with every request.
    pub api_key: String,
    /// Bounded wait applied to token refresh calls, in seconds.
    pub refresh_timeout_secs: u64,
}

impl AuthConfig {
    /// Load from `AUTH_BASE_URL`, `AUTH_API_KEY`, and optional
    /// `AUTH_REFRESH_TIMEOUT_SECS`.
    /// Returns `None` if a required variable is missing (auth disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("AUTH_BASE_URL").ok()?;
        let api_key = std::env::var("AUTH_API_KEY").ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            refresh_timeout_secs: env_parse("AUTH_REFRESH_TIMEOUT_SECS", DEFAULT_REFRESH_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn refresh_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_timeout_secs)
    }
}

/// Document store endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the document service, no trailing slash.
    pub base_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Load from `STORE_BASE_URL` and optional `STORE_REQUEST_TIMEOUT_SECS`.
    /// Returns `None` if the base URL is missing (persistence disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("STORE_BASE_URL").ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout_secs: env_parse("STORE_REQUEST_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS),
        })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
