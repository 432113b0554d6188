use std::fmt;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_WAIT_CEILING: Duration = Duration::from_secs(300);
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Deployment state as reported by the distribution service.
///
/// Transitions are observed, never driven: the caller only polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentState {
    Baking,
    Validating,
    Deploying,
    Complete,
    RollingBack,
    RolledBack,
    Reverted,
    Failed,
    Other(String),
}

impl DeploymentState {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "BAKING" => Self::Baking,
            "VALIDATING" => Self::Validating,
            "DEPLOYING" => Self::Deploying,
            "COMPLETE" => Self::Complete,
            "ROLLING_BACK" => Self::RollingBack,
            "ROLLED_BACK" => Self::RolledBack,
            "REVERTED" => Self::Reverted,
            "FAILED" => Self::Failed,
            _ => Self::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Baking => "BAKING",
            Self::Validating => "VALIDATING",
            Self::Deploying => "DEPLOYING",
            Self::Complete => "COMPLETE",
            Self::RollingBack => "ROLLING_BACK",
            Self::RolledBack => "ROLLED_BACK",
            Self::Reverted => "REVERTED",
            Self::Failed => "FAILED",
            Self::Other(label) => label,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::RolledBack | Self::Reverted)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything `StartDeployment` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub application_id: String,
    pub environment_id: String,
    pub configuration_profile_id: String,
    pub deployment_strategy_id: String,
    pub configuration_version: i32,
    pub description: String,
}

/// Identifies one deployment to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub application_id: String,
    pub environment_id: String,
    pub deployment_number: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchPolicy {
    pub interval: Duration,
    pub ceiling: Duration,
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            ceiling: DEFAULT_WAIT_CEILING,
        }
    }
}

impl WatchPolicy {
    /// Upper bound on status calls for this policy.
    pub fn max_polls(&self) -> u64 {
        if self.interval.is_zero() {
            return 1;
        }
        let ceiling = self.ceiling.as_millis();
        let interval = self.interval.as_millis();
        ceiling.div_ceil(interval).max(1) as u64
    }
}

pub fn deployment_description(bucket: &str, key: &str) -> String {
    format!("Automated deployment from S3 bucket {bucket}, key {key}")
}
