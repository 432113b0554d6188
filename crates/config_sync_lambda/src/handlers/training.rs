use config_sync_core::contract::{
    normalize_event, EnvLookup, TrainingTriggerRequest, TrainingTriggerResult,
};
use config_sync_core::error::SyncError;
use config_sync_core::storage_keys::{next_output_version, output_listing_prefix};
use config_sync_core::training::{TrainingJobSpec, TrainingSection};
use serde_json::Value;
use tracing::info;

use crate::adapters::object_store::ObjectStore;
use crate::adapters::training_jobs::TrainingJobLauncher;
use crate::loader::load_document;
use crate::response::{respond, HandlerResponse};

const OPERATION: &str = "trigger_model_training";

pub fn handle_training_event(
    event: Value,
    env_lookup: EnvLookup<'_>,
    store: &impl ObjectStore,
    launcher: &impl TrainingJobLauncher,
) -> HandlerResponse {
    let outcome = normalize_event(&event, "body")
        .and_then(|payload| TrainingTriggerRequest::resolve(&payload, env_lookup))
        .and_then(|request| trigger_training(&request, store, launcher));
    respond(OPERATION, outcome)
}

/// Loads the training config, picks the next output version, submits one job.
///
/// The version is computed from a listing with no lease held, so concurrent
/// invocations may race to the same version.
pub fn trigger_training(
    request: &TrainingTriggerRequest,
    store: &impl ObjectStore,
    launcher: &impl TrainingJobLauncher,
) -> Result<TrainingTriggerResult, SyncError> {
    let document = load_document(store, &request.bucket_name, &request.config_key)?;
    let section = TrainingSection::from_document(&document)?;

    let prefix = &section.output.s3_path_prefix;
    let keys = store.list_keys(&request.bucket_name, &output_listing_prefix(prefix))?;
    let version = next_output_version(prefix, keys.iter().map(String::as_str));
    info!(
        event = "output_version_selected",
        prefix = %prefix,
        existing_keys = keys.len(),
        version,
    );

    let spec = TrainingJobSpec::build(
        &section,
        &request.bucket_name,
        &request.role_arn,
        &request.region,
        version,
    );
    let training_job_arn = launcher.create_training_job(&spec)?;
    info!(
        event = "training_job_created",
        job_name = %spec.job_name,
        output_s3_uri = %spec.output_s3_uri,
    );

    Ok(TrainingTriggerResult {
        training_job_name: spec.job_name,
        output_s3_uri: spec.output_s3_uri,
        version,
        training_job_arn,
    })
}
