use config_sync_core::contract::{
    normalize_event, EnvLookup, ParameterData, ParameterRequest, ParameterResult,
};
use config_sync_core::error::SyncError;
use config_sync_core::lookup::lookup_parameter;
use serde_json::{Map, Value};
use tracing::info;

use crate::adapters::config_session::ConfigSession;
use crate::loader::decode_document;
use crate::response::{respond, HandlerResponse};

const OPERATION: &str = "fetch_parameter";

pub fn handle_parameter_event(
    event: Value,
    env_lookup: EnvLookup<'_>,
    session: &impl ConfigSession,
) -> HandlerResponse {
    let outcome = normalize_event(&event, "ResourceProperties")
        .and_then(|payload| ParameterRequest::resolve(&payload, env_lookup))
        .and_then(|request| fetch_parameter(&request, session));
    respond(OPERATION, outcome)
}

pub fn fetch_parameter(
    request: &ParameterRequest,
    session: &impl ConfigSession,
) -> Result<ParameterResult, SyncError> {
    let document = fetch_document(request, session)?;

    let (physical_resource_id, parameter_value) = match &request.parameter_key {
        Some(parameter_key) => {
            let value = lookup_parameter(&document, parameter_key)?.clone();
            info!(event = "parameter_resolved", parameter_key = %parameter_key);
            (format!("AppConfigParameter-{parameter_key}"), value)
        }
        None => (
            "AppConfigParameter-all".to_string(),
            Value::Object(document),
        ),
    };

    Ok(ParameterResult {
        physical_resource_id,
        data: ParameterData { parameter_value },
    })
}

/// Session → token → latest configuration → decoded document.
pub fn fetch_document(
    request: &ParameterRequest,
    session: &impl ConfigSession,
) -> Result<Map<String, Value>, SyncError> {
    let token = session.start_session(request)?.ok_or_else(|| {
        SyncError::transport(
            "failed to start configuration session",
            "no InitialConfigurationToken returned",
        )
    })?;

    let bytes = session.latest_configuration(&token)?;
    info!(
        event = "configuration_received",
        application_id = %request.application_id,
        environment_id = %request.environment_id,
        bytes = bytes.len(),
    );
    if bytes.is_empty() {
        return Ok(Map::new());
    }
    decode_document(&bytes, "latest configuration")
}
