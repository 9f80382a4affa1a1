use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use mindroot_client::MindRootError;
use mindroot_client::TaskClient;
use tracing_subscriber::EnvFilter;

mod output;

pub use output::MAX_RESULT_CHARS;
pub use output::render_json;
pub use output::render_text;

/// Base URL used when `--url` is not given. The local development server
/// listens here, which is not the port shown in the library examples.
pub const DEFAULT_URL: &str = "http://localhost:8012";

pub const DEFAULT_AGENT: &str = "Assistant";

#[derive(Debug, Parser)]
#[command(name = "mindroot", version)]
#[command(about = "MindRoot API Command Line Interface")]
pub struct Cli {
    /// Instructions for the AI agent.
    pub instructions: String,

    /// Name of the agent.
    #[arg(long, default_value = DEFAULT_AGENT)]
    pub agent: String,

    /// Include the full command trace in the results.
    #[arg(long)]
    pub trace: bool,

    /// Base URL of the MindRoot API.
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,

    /// API key; falls back to the MINDROOT_API_KEY environment variable.
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "mindroot_client=debug,mindroot_cli=debug,mindroot::telemetry=info"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        instructions,
        agent,
        trace,
        url,
        json,
        api_key,
        timeout,
        verbose: _,
    } = cli;

    let client = TaskClient::new(
        api_key.as_deref(),
        Some(url.as_str()),
        Duration::from_secs(timeout),
    )
    .map_err(MindRootError::from)?;
    tracing::debug!(agent = %agent, base_url = client.base_url(), "running task");

    let result = client.run_task(&agent, &instructions, trace)?;

    if json {
        println!("{}", render_json(&result).context("failed to encode result")?);
    } else {
        print!("{}", render_text(&result, std::io::stdout().is_terminal()));
    }
    Ok(())
}

/// Message printed on stderr for a failed run. Configuration and remote
/// failures are reported as errors; anything else is unexpected.
pub fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MindRootError>() {
        Some(MindRootError::Config(_) | MindRootError::Remote(_)) => format!("Error: {err}"),
        _ => format!("Unexpected error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindroot_client::ConfigError;
    use mindroot_client::RemoteError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_documented_cli() {
        let cli = Cli::try_parse_from(["mindroot", "do something"]).unwrap();
        assert_eq!(cli.instructions, "do something");
        assert_eq!(cli.agent, "Assistant");
        assert_eq!(cli.url, "http://localhost:8012");
        assert_eq!(cli.timeout, 300);
        assert!(!cli.trace);
        assert!(!cli.json);
        assert_eq!(cli.api_key, None);
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "mindroot",
            "hi",
            "--agent",
            "Coder",
            "--trace",
            "--json",
            "--url",
            "http://example.test:9000",
            "--api-key",
            "k",
            "--timeout",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.agent, "Coder");
        assert!(cli.trace);
        assert!(cli.json);
        assert_eq!(cli.url, "http://example.test:9000");
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.timeout, 10);
    }

    #[test]
    fn instructions_are_required() {
        assert!(Cli::try_parse_from(["mindroot"]).is_err());
    }

    #[test]
    fn classified_failures_are_reported_as_errors() {
        let err = anyhow::Error::from(MindRootError::from(RemoteError::Api("boom".to_string())));
        assert_eq!(failure_message(&err), "Error: boom");

        let err = anyhow::Error::from(MindRootError::from(ConfigError::MissingBaseUrl));
        assert!(failure_message(&err).starts_with("Error: base_url must be provided"));
    }

    #[test]
    fn other_failures_are_unexpected() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(failure_message(&err), "Unexpected error: disk full");
    }
}
