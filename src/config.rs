use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{JournalError, Result};

pub const DEFAULT_REMOTE_PATH: &str = "/remedies_journal.json";
pub const DEFAULT_LOCAL_FALLBACK: &str = "data.json";
pub const DEFAULT_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// What the store does when the remote backend fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Report an empty journal on read and a failed write, never touching local storage.
    Strict,
    /// Read and write the local fallback file instead.
    #[default]
    LocalFallback,
}

impl FromStr for FailurePolicy {
    type Err = JournalError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" | "strict-remote" => Ok(FailurePolicy::Strict),
            "local-fallback" | "local" | "fallback" => Ok(FailurePolicy::LocalFallback),
            other => Err(JournalError::ConfigError {
                message: format!("unknown failure policy: {}", other),
            }),
        }
    }
}

/// Application configuration, resolved once at startup.
#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    /// Remote store credential; `None` means local-only mode
    #[serde(skip_serializing, default)]
    pub token: Option<String>,

    /// Path of the journal document on the remote store
    pub remote_path: String,

    /// Local file used without a token, or on remote failure
    pub local_fallback: PathBuf,

    pub failure_policy: FailurePolicy,

    /// Base URL of the remote store API
    pub api_url: String,

    /// Pause between conflicting upload attempts, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: None,
            remote_path: DEFAULT_REMOTE_PATH.to_string(),
            local_fallback: PathBuf::from(DEFAULT_LOCAL_FALLBACK),
            failure_policy: FailurePolicy::default(),
            api_url: DEFAULT_API_URL.to_string(),
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl Config {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let failure_policy = match var("FAILURE_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.failure_policy,
        };

        let retry_backoff_ms = match var("RETRY_BACKOFF_MS") {
            Some(value) => value.trim().parse().map_err(|_| JournalError::ConfigError {
                message: format!("RETRY_BACKOFF_MS is not a number: {}", value),
            })?,
            None => defaults.retry_backoff_ms,
        };

        Ok(Config {
            token: var("YANDEX_TOKEN"),
            remote_path: var("REMOTE_PATH").unwrap_or(defaults.remote_path),
            local_fallback: var("LOCAL_FALLBACK")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_fallback),
            failure_policy,
            api_url: var("YANDEX_API_URL").unwrap_or(defaults.api_url),
            retry_backoff_ms,
        })
    }

    pub fn has_remote(&self) -> bool {
        self.token.is_some()
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("remote_path", &self.remote_path)
            .field("local_fallback", &self.local_fallback)
            .field("failure_policy", &self.failure_policy)
            .field("api_url", &self.api_url)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}
