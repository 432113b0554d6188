mod support;

use config_sync_lambda::handlers::parameter::handle_parameter_event;
use serde_json::{json, Value};
use support::fakes::{no_env, FakeSession};

fn fetch_event(parameter_key: Option<&str>) -> Value {
    let mut properties = json!({
        "ApplicationId": "app-1",
        "EnvironmentId": "env-1",
        "ConfigurationProfileId": "profile-1"
    });
    if let Some(key) = parameter_key {
        properties["ParameterKey"] = json!(key);
    }
    properties
}

#[test]
fn resolves_dotted_parameter_key() {
    let session = FakeSession::serving(br#"{"a": {"b": {"c": 42}}}"#);

    let response = handle_parameter_event(fetch_event(Some("a.b.c")), &no_env, &session);

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["Data"]["ParameterValue"], json!(42));
    assert_eq!(
        response.body["PhysicalResourceId"],
        json!("AppConfigParameter-a.b.c")
    );
    assert_eq!(session.sessions()[0].min_poll_interval_seconds, 30);
}

#[test]
fn missing_segment_is_not_found_with_available_keys() {
    let session = FakeSession::serving(br#"{"a": {"b": {}}, "version": 3}"#);

    let response = handle_parameter_event(fetch_event(Some("a.b.c")), &no_env, &session);

    assert_eq!(response.status_code, 404);
    assert_eq!(response.body["error"], json!("not_found"));
    assert!(response.body["message"]
        .as_str()
        .expect("message is a string")
        .contains("a.b.c"));
    assert_eq!(response.body["available_keys"], json!(["a", "version"]));
}

#[test]
fn returns_whole_document_without_parameter_key() {
    let session = FakeSession::serving(br#"{"threshold": 0.7, "labels": ["a", "b"]}"#);

    let response = handle_parameter_event(fetch_event(None), &no_env, &session);

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body["Data"]["ParameterValue"],
        json!({"threshold": 0.7, "labels": ["a", "b"]})
    );
    assert_eq!(
        response.body["PhysicalResourceId"],
        json!("AppConfigParameter-all")
    );
}

#[test]
fn accepts_custom_resource_event_shape() {
    let session = FakeSession::serving(br#"{"endpoint": "model-a-endpoint"}"#);
    let event = json!({
        "RequestType": "Create",
        "ResourceProperties": {
            "ApplicationId": "app-1",
            "EnvironmentId": "env-1",
            "ConfigurationProfileId": "profile-1",
            "ParameterKey": "endpoint",
            "RequiredMinimumPollIntervalInSeconds": "45"
        }
    });

    let response = handle_parameter_event(event, &no_env, &session);

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body["Data"]["ParameterValue"],
        json!("model-a-endpoint")
    );
    assert_eq!(session.sessions()[0].min_poll_interval_seconds, 45);
}

#[test]
fn empty_configuration_payload_decodes_as_empty_document() {
    let session = FakeSession::serving(b"");

    let response = handle_parameter_event(fetch_event(None), &no_env, &session);

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["Data"]["ParameterValue"], json!({}));
}

#[test]
fn missing_identifiers_fail_before_opening_a_session() {
    let session = FakeSession::serving(b"{}");

    let response = handle_parameter_event(json!({"ApplicationId": "app-1"}), &no_env, &session);

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body["missing"],
        json!(["EnvironmentId", "ConfigurationProfileId"])
    );
    assert!(session.sessions().is_empty());
}

#[test]
fn missing_session_token_is_transport_error() {
    let session = FakeSession::without_token();

    let response = handle_parameter_event(fetch_event(Some("a")), &no_env, &session);

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body["error"], json!("transport_error"));
}

#[test]
fn malformed_configuration_is_decode_error() {
    let session = FakeSession::serving(b"threshold=0.7");

    let response = handle_parameter_event(fetch_event(Some("threshold")), &no_env, &session);

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body["error"], json!("decode_error"));
}
