mod support;

use config_sync_core::contract::content_hash;
use config_sync_lambda::handlers::direct_deploy::handle_direct_deploy_event;
use serde_json::json;
use support::fakes::{no_env, MemoryObjectStore, RecordingDistribution};

const RAW_CONFIG: &[u8] = b"{\n  \"modelName\": \"model-a\",\n  \"threshold\": 0.7\n}\n";

#[test]
fn publishes_raw_bytes_and_reports_content_hash() {
    let store = MemoryObjectStore::new();
    store.seed("configs/model-config.json", RAW_CONFIG);
    let distribution = RecordingDistribution::new(&["DEPLOYING"]);

    let response = handle_direct_deploy_event(
        json!({
            "bucket": "model-artifacts",
            "key": "configs/model-config.json",
            "application_id": "app-1",
            "environment_id": "env-1",
            "configuration_profile_id": "profile-1",
            "deployment_strategy_id": "strategy-1"
        }),
        &no_env,
        &store,
        &distribution,
    );

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["versionNumber"], json!(1));
    assert_eq!(response.body["deploymentNumber"], json!(1));
    assert_eq!(
        response.body["contentHash"],
        json!(content_hash(RAW_CONFIG))
    );
    assert_eq!(distribution.versions()[0].content, RAW_CONFIG);
    assert_eq!(distribution.status_calls(), 0);
}

#[test]
fn lists_every_missing_parameter() {
    let store = MemoryObjectStore::new();
    let distribution = RecordingDistribution::new(&["COMPLETE"]);

    let response = handle_direct_deploy_event(
        json!({
            "bucket": "model-artifacts",
            "deployment_strategy_id": "strategy-1"
        }),
        &no_env,
        &store,
        &distribution,
    );

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body["missing"],
        json!([
            "key",
            "application_id",
            "environment_id",
            "configuration_profile_id"
        ])
    );
    assert!(store.calls().is_empty());
    assert_eq!(distribution.total_calls(), 0);
}

#[test]
fn accepts_api_gateway_string_body() {
    let store = MemoryObjectStore::new();
    store.seed("configs/model-config.json", RAW_CONFIG);
    let distribution = RecordingDistribution::new(&["COMPLETE"]);
    let body = json!({
        "bucket": "model-artifacts",
        "key": "configs/model-config.json",
        "application_id": "app-1",
        "environment_id": "env-1",
        "configuration_profile_id": "profile-1",
        "deployment_strategy_id": "strategy-1"
    })
    .to_string();

    let response =
        handle_direct_deploy_event(json!({"body": body}), &no_env, &store, &distribution);

    assert_eq!(response.status_code, 200);
}

#[test]
fn missing_object_is_not_found() {
    let store = MemoryObjectStore::new();
    let distribution = RecordingDistribution::new(&["COMPLETE"]);

    let response = handle_direct_deploy_event(
        json!({
            "bucket": "model-artifacts",
            "key": "configs/absent.json",
            "application_id": "app-1",
            "environment_id": "env-1",
            "configuration_profile_id": "profile-1",
            "deployment_strategy_id": "strategy-1"
        }),
        &no_env,
        &store,
        &distribution,
    );

    assert_eq!(response.status_code, 404);
    assert_eq!(
        response.body["message"],
        json!("s3://model-artifacts/configs/absent.json not found")
    );
    assert_eq!(distribution.total_calls(), 0);
}
