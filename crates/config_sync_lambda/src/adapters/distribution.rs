use config_sync_core::deployment::{DeploymentRequest, DeploymentState, DeploymentTarget};
use config_sync_core::error::SyncError;

/// Control plane of the configuration-distribution service.
pub trait ConfigDistribution {
    /// Creates a new immutable hosted version and returns its number.
    fn create_hosted_version(
        &self,
        application_id: &str,
        configuration_profile_id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<i32, SyncError>;

    /// Starts a rollout and returns the deployment number.
    fn start_deployment(&self, request: &DeploymentRequest) -> Result<i32, SyncError>;

    fn get_deployment_state(&self, target: &DeploymentTarget)
        -> Result<DeploymentState, SyncError>;
}
