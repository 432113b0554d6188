use std::time::{Duration, Instant};

use config_sync_core::deployment::{DeploymentState, DeploymentTarget, WatchPolicy};
use config_sync_core::error::SyncError;
use tracing::{error, info};

use crate::adapters::distribution::ConfigDistribution;

/// Time source for the poll loop.
pub trait PollClock {
    fn elapsed(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemPollClock {
    started_at: Instant,
}

impl SystemPollClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl PollClock for SystemPollClock {
    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        tokio::task::block_in_place(|| std::thread::sleep(duration));
    }
}

/// Polls until the deployment reaches a terminal state or the ceiling passes.
///
/// Never calls the status API again after a terminal state. Running past the
/// ceiling while still non-terminal is reported as `DeploymentTimedOut`.
pub fn watch_deployment(
    distribution: &impl ConfigDistribution,
    clock: &impl PollClock,
    target: &DeploymentTarget,
    policy: WatchPolicy,
) -> Result<DeploymentState, SyncError> {
    let mut last_state: Option<DeploymentState> = None;
    let mut polls = 0u64;

    while clock.elapsed() < policy.ceiling && polls < policy.max_polls() {
        let state = distribution.get_deployment_state(target)?;
        polls += 1;
        info!(
            event = "deployment_status",
            deployment_number = target.deployment_number,
            status = %state,
            poll = polls,
        );

        if state.is_success() {
            info!(
                event = "deployment_completed",
                deployment_number = target.deployment_number
            );
            return Ok(state);
        }
        if state.is_failure() {
            error!(
                event = "deployment_failed",
                deployment_number = target.deployment_number,
                status = %state,
            );
            return Err(SyncError::DeploymentFailed {
                status: state.to_string(),
            });
        }

        last_state = Some(state);
        if polls >= policy.max_polls() {
            break;
        }
        clock.sleep(policy.interval);
    }

    let last_status = last_state
        .map(|state| state.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    error!(
        event = "deployment_wait_timed_out",
        deployment_number = target.deployment_number,
        last_status = %last_status,
        polls,
    );
    Err(SyncError::DeploymentTimedOut {
        deployment_number: target.deployment_number,
        last_status,
    })
}
