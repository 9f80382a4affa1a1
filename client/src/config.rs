use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::client::TaskClient;
use crate::error::ConfigError;

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV_VAR: &str = "MINDROOT_API_KEY";

/// Per-request timeout used unless the caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Source of environment values, injectable so callers and tests can decide
/// what "the environment" is without touching process state.
#[derive(Clone)]
pub struct EnvLookup(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>);

impl EnvLookup {
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(lookup))
    }

    /// Reads the real process environment.
    pub fn process() -> Self {
        Self::new(|name| std::env::var(name).ok())
    }

    /// An environment in which nothing is set.
    pub fn empty() -> Self {
        Self::new(|_| None)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

impl Default for EnvLookup {
    fn default() -> Self {
        Self::process()
    }
}

impl fmt::Debug for EnvLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnvLookup(..)")
    }
}

#[derive(Debug)]
pub struct TaskClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    env: EnvLookup,
}

impl Default for TaskClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            env: EnvLookup::process(),
        }
    }
}

impl TaskClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<Option<String>>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<Option<String>>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn build(self) -> Result<TaskClient, ConfigError> {
        let api_key = resolve_api_key(self.api_key, &self.env)?;
        let base_url = self
            .base_url
            .as_deref()
            .map(normalize_base_url)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        Ok(TaskClient::from_parts(api_key, base_url, self.timeout))
    }
}

fn resolve_api_key(explicit: Option<String>, env: &EnvLookup) -> Result<String, ConfigError> {
    explicit
        .filter(|key| !key.is_empty())
        .or_else(|| env.get(API_KEY_ENV_VAR).filter(|key| !key.is_empty()))
        .ok_or(ConfigError::MissingCredential)
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
