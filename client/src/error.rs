use std::error::Error as _;

use reqwest::StatusCode;
use thiserror::Error;

pub type MindRootResult<T, E = MindRootError> = Result<T, E>;

/// Fallback text for an API error payload that carries no `message`.
pub const UNKNOWN_API_ERROR: &str = "Unknown error from MindRoot API";

#[derive(Debug, Error)]
pub enum MindRootError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The server answered with a success status but the body was not the
    /// expected JSON object.
    #[error("failed to decode task response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl MindRootError {
    /// True for every failure that happened while talking to the server,
    /// whatever the sub-case.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Raised while building a [`crate::TaskClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key must be provided or set as {var} environment variable", var = crate::API_KEY_ENV_VAR)]
    MissingCredential,

    #[error("base_url must be provided (e.g., 'http://localhost:8010')")]
    MissingBaseUrl,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout and the like.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request failed with status {status}{}", format_body(.body))]
    Status { status: StatusCode, body: String },

    #[error("{0}")]
    Api(String),
}

impl RemoteError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Api(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(describe_transport_error(err))
    }
}

/// Flattens a transport error and its causes into one line. The URL is
/// dropped because it carries the API key.
fn describe_transport_error(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !description.contains(&cause_text) {
            description.push_str(": ");
            description.push_str(&cause_text);
        }
        source = cause.source();
    }
    description
}

fn format_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}
