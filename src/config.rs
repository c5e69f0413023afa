use reqwest::Url;
use std::env;

use crate::models::AppError;

/// Environment variable holding the service base URL
pub const BASE_URL_ENV: &str = "SQLGEN_BASE_URL";

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Fixed path of the SQL generation endpoint
pub const GENERATE_PATH: &str = "/generate";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
}

impl Config {
    /// Parses `base_url` into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "unsupported URL scheme {:?}",
                base_url.scheme()
            )));
        }

        Ok(Self { base_url })
    }

    /// Reads the configuration from `SQLGEN_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_value(env::var(BASE_URL_ENV).ok().as_deref())
    }

    /// Builds the configuration from the value of `SQLGEN_BASE_URL`, if set.
    ///
    /// An unset or blank value falls back to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the value is not a valid base URL.
    pub fn from_env_value(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            Some(base_url) if !base_url.is_empty() => Self::new(base_url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    /// Full URL of the generate endpoint.
    ///
    /// The path is absolute, so any path on the base URL is replaced, the
    /// same way a page-relative `fetch("/generate")` resolves.
    #[must_use]
    pub fn generate_url(&self) -> String {
        let mut url = self.base_url.clone();
        url.set_path(GENERATE_PATH);
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        // DEFAULT_BASE_URL is a literal known to parse
        Self::new(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!())
    }
}
