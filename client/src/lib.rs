//! Client for submitting tasks to MindRoot agents.
//!
//! ```no_run
//! use std::time::Duration;
//! use mindroot_client::TaskClient;
//!
//! let client = TaskClient::new(None, Some("http://localhost:8010"), Duration::from_secs(300))?;
//! let result = client.run_task("Assistant", "Summarize the latest report", false)?;
//! println!("{}", result.results());
//! # Ok::<(), mindroot_client::MindRootError>(())
//! ```

mod client;
mod config;
mod error;
mod protocol;
mod telemetry;

pub use client::TaskClient;
pub use config::API_KEY_ENV_VAR;
pub use config::DEFAULT_TIMEOUT;
pub use config::EnvLookup;
pub use config::TaskClientBuilder;
pub use error::ConfigError;
pub use error::MindRootError;
pub use error::MindRootResult;
pub use error::RemoteError;
pub use error::UNKNOWN_API_ERROR;
pub use protocol::CommandRecord;
pub use protocol::TaskRequest;
pub use protocol::TaskResult;
pub use protocol::TaskTrace;
