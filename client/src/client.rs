use std::fmt;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

use crate::config::EnvLookup;
use crate::config::TaskClientBuilder;
use crate::error::ConfigError;
use crate::error::MindRootError;
use crate::error::MindRootResult;
use crate::error::RemoteError;
use crate::protocol::TaskRequest;
use crate::protocol::TaskResponse;
use crate::protocol::TaskResult;
use crate::telemetry::record_task_run;

/// Blocking client for the MindRoot task endpoint.
///
/// Holds only immutable configuration. A transport client is created for each
/// call, so a `TaskClient` can be cloned or shared between threads freely.
#[derive(Clone)]
pub struct TaskClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl TaskClient {
    /// Builds a client, reading `MINDROOT_API_KEY` from the process
    /// environment when `api_key` is absent or empty.
    pub fn new(
        api_key: Option<&str>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Self::with_env(api_key, base_url, timeout, EnvLookup::process())
    }

    /// Same as [`TaskClient::new`] with an explicit environment source.
    pub fn with_env(
        api_key: Option<&str>,
        base_url: Option<&str>,
        timeout: Duration,
        env: EnvLookup,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .api_key(api_key.map(str::to_string))
            .base_url(base_url.map(str::to_string))
            .timeout(timeout)
            .env(env)
            .build()
    }

    pub fn builder() -> TaskClientBuilder {
        TaskClientBuilder::new()
    }

    pub(crate) fn from_parts(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url,
            timeout,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Address of the task endpoint for `agent_name`, without the API key.
    pub fn task_url(&self, agent_name: &str) -> String {
        format!("{}/task/{agent_name}", self.base_url)
    }

    /// Runs `instructions` on the named agent and waits for the result.
    ///
    /// The calling thread blocks until the server answers or the configured
    /// timeout elapses. Trace fields are only reported when `include_trace`
    /// is set.
    pub fn run_task(
        &self,
        agent_name: &str,
        instructions: &str,
        include_trace: bool,
    ) -> MindRootResult<TaskResult> {
        let started = Instant::now();
        let outcome = self.execute(agent_name, instructions, include_trace);
        record_task_run(agent_name, include_trace, started.elapsed(), outcome.is_ok());
        outcome
    }

    fn execute(
        &self,
        agent_name: &str,
        instructions: &str,
        include_trace: bool,
    ) -> MindRootResult<TaskResult> {
        let url = self.task_url(agent_name);
        debug!(agent = agent_name, url = %url, include_trace, "submitting task");

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(RemoteError::from)?;
        let response = http
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .json(&TaskRequest { instructions })
            .send()
            .map_err(RemoteError::from)?;

        let status = response.status();
        let body = response.text().map_err(RemoteError::from)?;
        if !status.is_success() {
            warn!(agent = agent_name, %status, "task endpoint returned an error status");
            return Err(RemoteError::Status { status, body }.into());
        }

        let payload = TaskResponse::parse(&body).map_err(MindRootError::Decode)?;
        if payload.is_error() {
            let message = payload.error_message();
            warn!(agent = agent_name, %message, "task reported an error");
            return Err(RemoteError::Api(message).into());
        }

        Ok(payload.into_result(include_trace))
    }
}

impl fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
