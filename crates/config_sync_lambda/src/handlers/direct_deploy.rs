use config_sync_core::contract::{
    content_hash, normalize_event, DirectDeployRequest, DirectDeployResult, EnvLookup,
};
use config_sync_core::deployment::{deployment_description, DeploymentRequest, JSON_CONTENT_TYPE};
use config_sync_core::error::SyncError;
use serde_json::Value;
use tracing::info;

use crate::adapters::distribution::ConfigDistribution;
use crate::adapters::object_store::ObjectStore;
use crate::response::{respond, HandlerResponse};

const OPERATION: &str = "deploy_config";

pub fn handle_direct_deploy_event(
    event: Value,
    env_lookup: EnvLookup<'_>,
    store: &impl ObjectStore,
    distribution: &impl ConfigDistribution,
) -> HandlerResponse {
    let outcome = normalize_event(&event, "body")
        .and_then(|payload| DirectDeployRequest::resolve(&payload, env_lookup))
        .and_then(|request| deploy_object(&request, store, distribution));
    respond(OPERATION, outcome)
}

/// Publishes the object's bytes as-is and starts a deployment without waiting.
pub fn deploy_object(
    request: &DirectDeployRequest,
    store: &impl ObjectStore,
    distribution: &impl ConfigDistribution,
) -> Result<DirectDeployResult, SyncError> {
    let content = store.get_object(&request.bucket, &request.key)?;
    let content_hash = content_hash(&content);

    let version_number = distribution.create_hosted_version(
        &request.application_id,
        &request.configuration_profile_id,
        &content,
        JSON_CONTENT_TYPE,
    )?;
    info!(event = "version_created", version_number, content_hash = %content_hash);

    let deployment_number = distribution.start_deployment(&DeploymentRequest {
        application_id: request.application_id.clone(),
        environment_id: request.environment_id.clone(),
        configuration_profile_id: request.configuration_profile_id.clone(),
        deployment_strategy_id: request.deployment_strategy_id.clone(),
        configuration_version: version_number,
        description: deployment_description(&request.bucket, &request.key),
    })?;
    info!(
        event = "deployment_started",
        deployment_number,
        version_number
    );

    Ok(DirectDeployResult {
        version_number,
        deployment_number,
        content_hash,
    })
}
