use std::time::Duration;

use tracing::info;

/// Emit a telemetry log for a finished task run.
pub(crate) fn record_task_run(agent_name: &str, include_trace: bool, duration: Duration, success: bool) {
    let duration_ms = duration.as_millis().min(u128::from(u64::MAX)) as u64;
    info!(
        target: "mindroot::telemetry",
        event = "task_run",
        agent = agent_name,
        include_trace,
        success,
        duration_ms,
    );
}
