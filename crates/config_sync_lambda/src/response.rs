use config_sync_core::error::SyncError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

/// Envelope every entry point returns to its invoker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

pub fn success_response(payload: impl Serialize) -> HandlerResponse {
    match serde_json::to_value(payload) {
        Ok(body) => HandlerResponse {
            status_code: 200,
            body,
        },
        Err(error) => HandlerResponse {
            status_code: 500,
            body: json!({
                "error": "serialization_error",
                "message": error.to_string(),
            }),
        },
    }
}

/// Logs the failure with full detail and maps it to its status code.
pub fn error_response(operation: &str, failure: &SyncError) -> HandlerResponse {
    let status_code = failure.status_code();
    error!(
        event = "request_failed",
        operation,
        status_code,
        kind = failure.kind(),
        error = %failure,
        details = ?failure,
    );

    let mut body = json!({
        "error": failure.kind(),
        "message": failure.to_string(),
    });
    match failure {
        SyncError::Validation { missing } => {
            body["missing"] = json!(missing);
        }
        SyncError::ParameterNotFound { available_keys, .. } => {
            body["available_keys"] = json!(available_keys);
        }
        _ => {}
    }

    HandlerResponse { status_code, body }
}

pub fn respond<T: Serialize>(operation: &str, outcome: Result<T, SyncError>) -> HandlerResponse {
    match outcome {
        Ok(payload) => success_response(payload),
        Err(failure) => error_response(operation, &failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_response_lists_missing_names() {
        let response = error_response(
            "sync",
            &SyncError::Validation {
                missing: vec!["bucket".to_string()],
            },
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(response.body["missing"], json!(["bucket"]));
        assert_eq!(response.body["error"], json!("validation_error"));
    }

    #[test]
    fn parameter_not_found_reports_available_keys() {
        let response = error_response(
            "fetch_parameter",
            &SyncError::ParameterNotFound {
                parameter_key: "a.b".to_string(),
                available_keys: vec!["x".to_string()],
            },
        );

        assert_eq!(response.status_code, 404);
        assert_eq!(response.body["available_keys"], json!(["x"]));
    }

    #[test]
    fn serializes_status_code_in_camel_case() {
        let response = success_response(json!({"ok": true}));
        let encoded = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(encoded["statusCode"], json!(200));
        assert_eq!(encoded["body"]["ok"], json!(true));
    }
}
