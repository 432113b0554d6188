use config_sync_core::error::SyncError;
use config_sync_core::training::TrainingJobSpec;

pub trait TrainingJobLauncher {
    /// Submits the job and returns its ARN when the service reports one.
    fn create_training_job(&self, spec: &TrainingJobSpec) -> Result<Option<String>, SyncError>;
}
