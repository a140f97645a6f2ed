use crate::error::PipelineError;
use crate::services::{JobState, Sleeper, TranscriptionService};
use std::time::Duration;
use tracing::{debug, instrument, trace};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    // `None` waits forever
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Checks the job's status until it reaches `COMPLETED` or `FAILED` and returns that final
/// observation. Status is checked immediately, then once per `interval`.
///
/// A failed job is not an error here, the caller decides what a failure means. Errors are only
/// returned when the status call itself fails or when `max_attempts` runs out.
#[instrument(skip(service, sleeper, policy), fields(interval = ?policy.interval))]
pub async fn wait_for_terminal_state(
    service: &dyn TranscriptionService,
    sleeper: &dyn Sleeper,
    job_name: &str,
    policy: &PollPolicy,
) -> Result<JobState, PipelineError> {
    let mut attempts: u32 = 0;

    loop {
        let state = service
            .status(job_name)
            .await
            .map_err(|e| PipelineError::PollStatus {
                job_name: job_name.to_owned(),
                source: e.into(),
            })?;
        attempts += 1;

        if state.status.is_terminal() {
            debug!(attempts, status = ?state.status, "job reached a terminal state");
            return Ok(state);
        }

        if let Some(max_attempts) = policy.max_attempts {
            if attempts >= max_attempts {
                return Err(PipelineError::PollAttemptsExhausted {
                    job_name: job_name.to_owned(),
                    attempts,
                });
            }
        }

        trace!(attempts, "job is still running, waiting {:?}", policy.interval);
        sleeper.sleep(policy.interval).await;
    }
}
