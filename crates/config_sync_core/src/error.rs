use thiserror::Error;

/// Every failure an entry point can report.
///
/// Collaborator adapters translate SDK failures into these variants so the
/// handlers only ever match on domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Missing required parameters: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Parameter '{parameter_key}' not found in configuration")]
    ParameterNotFound {
        parameter_key: String,
        available_keys: Vec<String>,
    },

    #[error("{context}: {message}")]
    Transport { context: String, message: String },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("Error merging configurations: {source}")]
    Merge { source: Box<SyncError> },

    #[error("Deployment failed with status: {status}")]
    DeploymentFailed { status: String },

    #[error("Deployment {deployment_number} timed out (last status: {last_status})")]
    DeploymentTimedOut {
        deployment_number: i32,
        last_status: String,
    },

    #[error("Failed to create configuration version: {0}")]
    Publish(String),

    #[error("Failed to start deployment: {0}")]
    DeploymentStart(String),
}

impl SyncError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn transport(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub fn merge(source: SyncError) -> Self {
        Self::Merge {
            source: Box::new(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable machine-readable error kind used in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::MalformedEvent(_) => "validation_error",
            Self::NotFound { .. } | Self::ParameterNotFound { .. } => "not_found",
            Self::Transport { .. } => "transport_error",
            Self::Decode { .. } => "decode_error",
            Self::Merge { .. } => "merge_error",
            Self::DeploymentFailed { .. } => "deployment_failed",
            Self::DeploymentTimedOut { .. } => "deployment_timed_out",
            Self::Publish(_) => "publish_error",
            Self::DeploymentStart(_) => "deployment_start_error",
        }
    }

    /// HTTP-style status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::MalformedEvent(_) => 400,
            Self::NotFound { .. } | Self::ParameterNotFound { .. } => 404,
            _ => 500,
        }
    }
}
