use chrono::Utc;
use config_sync_core::contract::{normalize_event, EnvLookup, SyncRequest, SyncResult};
use config_sync_core::deployment::{
    deployment_description, DeploymentRequest, DeploymentTarget, WatchPolicy, JSON_CONTENT_TYPE,
};
use config_sync_core::error::SyncError;
use config_sync_core::lookup::top_level_keys;
use serde_json::Value;
use tracing::info;

use crate::adapters::distribution::ConfigDistribution;
use crate::adapters::object_store::ObjectStore;
use crate::loader::load_with_fallback;
use crate::response::{respond, HandlerResponse};
use crate::watcher::{watch_deployment, PollClock};

const OPERATION: &str = "sync_s3_to_appconfig";

/// Collaborators for the S3 → AppConfig sync flow.
pub struct SyncContext<'a, S, D, C> {
    pub store: &'a S,
    pub distribution: &'a D,
    pub clock: &'a C,
    pub policy: WatchPolicy,
}

pub fn handle_sync_event<S, D, C>(
    event: Value,
    env_lookup: EnvLookup<'_>,
    context: &SyncContext<'_, S, D, C>,
) -> HandlerResponse
where
    S: ObjectStore,
    D: ConfigDistribution,
    C: PollClock,
{
    let outcome = normalize_event(&event, "body")
        .and_then(|payload| SyncRequest::resolve(&payload, env_lookup))
        .and_then(|request| sync_configuration(&request, context));
    respond(OPERATION, outcome)
}

/// Loader → publisher → trigger → watcher (optional) → reporter.
pub fn sync_configuration<S, D, C>(
    request: &SyncRequest,
    context: &SyncContext<'_, S, D, C>,
) -> Result<SyncResult, SyncError>
where
    S: ObjectStore,
    D: ConfigDistribution,
    C: PollClock,
{
    info!(
        event = "sync_started",
        bucket = %request.bucket,
        key = %request.key,
        wait_for_deployment = request.wait_for_deployment,
    );
    let loaded = load_with_fallback(context.store, &request.bucket, &request.key)?;

    let content = serde_json::to_vec(&loaded.document)
        .map_err(|error| SyncError::decode("configuration document", error))?;
    let version_number = context.distribution.create_hosted_version(
        &request.application_id,
        &request.configuration_profile_id,
        &content,
        JSON_CONTENT_TYPE,
    )?;
    info!(event = "version_created", version_number);

    let deployment_number = context.distribution.start_deployment(&DeploymentRequest {
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

    let deployment_state = if request.wait_for_deployment {
        let target = DeploymentTarget {
            application_id: request.application_id.clone(),
            environment_id: request.environment_id.clone(),
            deployment_number,
        };
        let state = watch_deployment(context.distribution, context.clock, &target, context.policy)?;
        Some(state.to_string())
    } else {
        None
    };

    Ok(SyncResult {
        version_number,
        deployment_number,
        config_keys: top_level_keys(&loaded.document),
        deployment_state,
        used_fallback: loaded.used_fallback,
        event_time: Utc::now().to_rfc3339(),
    })
}
