//! Client configuration, from explicit values or from `BANKING_*` variables.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Url;
use std::time::Duration;

use crate::http::RetryPolicy;
use crate::runtime::Runtime;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8123";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const ENV_API_URL: &str = "BANKING_API_URL";
pub const ENV_API_TIMEOUT: &str = "BANKING_API_TIMEOUT";
pub const ENV_USERNAME: &str = "BANKING_USERNAME";
pub const ENV_PASSWORD: &str = "BANKING_PASSWORD";
pub const ENV_LOG_LEVEL: &str = "BANKING_LOG_LEVEL";
pub const ENV_MAX_RETRIES: &str = "BANKING_MAX_RETRIES";

#[derive(Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub default_username: String,
    pub default_password: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            default_username: DEFAULT_USERNAME.to_string(),
            default_password: DEFAULT_PASSWORD.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

// Hand-written so the password never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_username", &self.default_username)
            .field("default_password", &"********")
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Reads the `BANKING_*` variables, falling back to the defaults for
    /// anything unset. Fails only when a numeric variable does not parse.
    pub fn from_environment<R: Runtime>(runtime: &R) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| runtime.env_var(key).ok();

        let timeout = match var(ENV_API_TIMEOUT) {
            Some(value) => Duration::from_secs(
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| {
                        format!(
                            "{} must be a whole number of seconds, got {:?}",
                            ENV_API_TIMEOUT, value
                        )
                    })?,
            ),
            None => defaults.timeout,
        };

        let max_retries = match var(ENV_MAX_RETRIES) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .with_context(|| {
                    format!(
                        "{} must be a non-negative integer, got {:?}",
                        ENV_MAX_RETRIES, value
                    )
                })?,
            None => defaults.retry.max_retries,
        };

        let config = Self {
            base_url: var(ENV_API_URL).unwrap_or(defaults.base_url),
            timeout,
            retry: RetryPolicy {
                max_retries,
                ..defaults.retry
            },
            default_username: var(ENV_USERNAME).unwrap_or(defaults.default_username),
            default_password: var(ENV_PASSWORD).unwrap_or(defaults.default_password),
            log_level: var(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        };

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// False when the configuration must not be used: a base URL that is not
    /// an absolute http(s) URL, zero timeout, or unusable retry parameters.
    pub fn validate(&self) -> bool {
        is_http_url(&self.base_url) && !self.timeout.is_zero() && self.retry.is_valid()
    }
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
