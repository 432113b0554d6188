use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::SyncError;
use crate::storage_keys::{DEFAULT_SYNC_CONFIG_KEY, DEFAULT_TRAINING_CONFIG_KEY};

pub const DEFAULT_MIN_POLL_INTERVAL_SECONDS: i32 = 30;
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Environment variable names consulted when an event omits a key.
pub mod env {
    pub const CONFIG_BUCKET: &str = "CONFIG_BUCKET";
    pub const APPLICATION_ID: &str = "APPLICATION_ID";
    pub const ENVIRONMENT_ID: &str = "ENVIRONMENT_ID";
    pub const PROFILE_ID: &str = "CONFIGURATION_PROFILE_ID";
    pub const STRATEGY_ID: &str = "DEPLOYMENT_STRATEGY_ID";
    pub const PARAMETER_KEY: &str = "PARAMETER_KEY";
    pub const CONFIG_BUCKET_NAME: &str = "CONFIG_BUCKET_NAME";
    pub const CONFIG_KEY: &str = "CONFIG_KEY";
    pub const SAGEMAKER_ROLE_ARN: &str = "SAGEMAKER_ROLE_ARN";
    pub const AWS_REGION: &str = "AWS_REGION";
}

/// Variable lookup used for environment fallbacks; injectable so tests never
/// touch the process environment.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Resolves event keys with environment fallbacks, collecting every missing
/// required name before failing.
pub struct ParameterSource<'a> {
    event: &'a Map<String, Value>,
    env: EnvLookup<'a>,
    missing: Vec<String>,
}

impl<'a> ParameterSource<'a> {
    pub fn new(event: &'a Map<String, Value>, env: EnvLookup<'a>) -> Self {
        Self {
            event,
            env,
            missing: Vec::new(),
        }
    }

    pub fn optional(&self, key: &str, env_var: Option<&str>) -> Option<String> {
        self.event
            .get(key)
            .and_then(scalar_text)
            .or_else(|| env_var.and_then(|name| (self.env)(name)))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&mut self, key: &str, env_var: Option<&str>) -> String {
        match self.optional(key, env_var) {
            Some(value) => value,
            None => {
                self.missing.push(key.to_string());
                String::new()
            }
        }
    }

    /// Truthiness of an event flag: `null`, `0` and false-like strings are
    /// false, non-zero numbers are true, an absent key keeps `default`.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.event.get(key) {
            None => default,
            Some(Value::Null) => false,
            Some(Value::Bool(value)) => *value,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
            Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                _ => default,
            },
            Some(_) => default,
        }
    }

    pub fn finish(self) -> Result<(), SyncError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Validation {
                missing: self.missing,
            })
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Accepts either a bare event object or one wrapping the payload under
/// `wrapper_key` (e.g. `ResourceProperties`, or an API Gateway `body`).
pub fn normalize_event(event: &Value, wrapper_key: &str) -> Result<Map<String, Value>, SyncError> {
    let Some(object) = event.as_object() else {
        return Err(SyncError::MalformedEvent(
            "event payload must be a JSON object".to_string(),
        ));
    };

    match object.get(wrapper_key) {
        None | Some(Value::Null) => Ok(object.clone()),
        Some(Value::Object(inner)) => Ok(inner.clone()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(inner)) => Ok(inner),
            Ok(_) => Err(not_an_object(wrapper_key)),
            Err(error) => Err(SyncError::MalformedEvent(format!(
                "malformed JSON in {wrapper_key}: {error}"
            ))),
        },
        Some(_) => Err(not_an_object(wrapper_key)),
    }
}

fn not_an_object(wrapper_key: &str) -> SyncError {
    SyncError::MalformedEvent(format!("{wrapper_key} must be a JSON object"))
}

/// S3 → AppConfig sync with optional wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub bucket: String,
    pub key: String,
    pub application_id: String,
    pub environment_id: String,
    pub configuration_profile_id: String,
    pub deployment_strategy_id: String,
    pub wait_for_deployment: bool,
}

impl SyncRequest {
    pub fn resolve(
        event: &Map<String, Value>,
        env_lookup: EnvLookup<'_>,
    ) -> Result<Self, SyncError> {
        let mut source = ParameterSource::new(event, env_lookup);
        let request = Self {
            bucket: source.required("bucket", Some(env::CONFIG_BUCKET)),
            key: source
                .optional("key", None)
                .unwrap_or_else(|| DEFAULT_SYNC_CONFIG_KEY.to_string()),
            application_id: source.required("application_id", Some(env::APPLICATION_ID)),
            environment_id: source.required("environment_id", Some(env::ENVIRONMENT_ID)),
            configuration_profile_id:
                source.required("configuration_profile_id", Some(env::PROFILE_ID)),
            deployment_strategy_id:
                source.required("deployment_strategy_id", Some(env::STRATEGY_ID)),
            wait_for_deployment: source.flag("wait_for_deployment", true),
        };
        source.finish()?;
        Ok(request)
    }
}

/// Publish an object's raw bytes and start a deployment without waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDeployRequest {
    pub bucket: String,
    pub key: String,
    pub application_id: String,
    pub environment_id: String,
    pub configuration_profile_id: String,
    pub deployment_strategy_id: String,
}

impl DirectDeployRequest {
    pub fn resolve(
        event: &Map<String, Value>,
        env_lookup: EnvLookup<'_>,
    ) -> Result<Self, SyncError> {
        let mut source = ParameterSource::new(event, env_lookup);
        let request = Self {
            bucket: source.required("bucket", Some(env::CONFIG_BUCKET)),
            key: source.required("key", None),
            application_id: source.required("application_id", Some(env::APPLICATION_ID)),
            environment_id: source.required("environment_id", Some(env::ENVIRONMENT_ID)),
            configuration_profile_id:
                source.required("configuration_profile_id", Some(env::PROFILE_ID)),
            deployment_strategy_id:
                source.required("deployment_strategy_id", Some(env::STRATEGY_ID)),
        };
        source.finish()?;
        Ok(request)
    }
}

/// Single-value lookup against the AppConfig data plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRequest {
    pub application_id: String,
    pub environment_id: String,
    pub configuration_profile_id: String,
    pub parameter_key: Option<String>,
    pub min_poll_interval_seconds: i32,
}

impl ParameterRequest {
    /// Missing identifiers are reported before the poll interval is checked.
    pub fn resolve(
        event: &Map<String, Value>,
        env_lookup: EnvLookup<'_>,
    ) -> Result<Self, SyncError> {
        let mut source = ParameterSource::new(event, env_lookup);
        let application_id = source.required("ApplicationId", Some(env::APPLICATION_ID));
        let environment_id = source.required("EnvironmentId", Some(env::ENVIRONMENT_ID));
        let configuration_profile_id =
            source.required("ConfigurationProfileId", Some(env::PROFILE_ID));
        let parameter_key = source.optional("ParameterKey", Some(env::PARAMETER_KEY));
        let interval = source.optional("RequiredMinimumPollIntervalInSeconds", None);
        source.finish()?;

        Ok(Self {
            application_id,
            environment_id,
            configuration_profile_id,
            parameter_key,
            min_poll_interval_seconds: poll_interval(interval)?,
        })
    }
}

fn poll_interval(text: Option<String>) -> Result<i32, SyncError> {
    let Some(text) = text else {
        return Ok(DEFAULT_MIN_POLL_INTERVAL_SECONDS);
    };
    match text.parse::<i32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SyncError::MalformedEvent(format!(
            "RequiredMinimumPollIntervalInSeconds must be a positive integer, got '{text}'"
        ))),
    }
}

/// Training-job launch against the latest training configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingTriggerRequest {
    pub bucket_name: String,
    pub config_key: String,
    pub role_arn: String,
    pub region: String,
}

impl TrainingTriggerRequest {
    pub fn resolve(
        event: &Map<String, Value>,
        env_lookup: EnvLookup<'_>,
    ) -> Result<Self, SyncError> {
        let mut source = ParameterSource::new(event, env_lookup);
        let request = Self {
            bucket_name: source.required("bucket_name", Some(env::CONFIG_BUCKET_NAME)),
            config_key: source
                .optional("config_key", Some(env::CONFIG_KEY))
                .unwrap_or_else(|| DEFAULT_TRAINING_CONFIG_KEY.to_string()),
            role_arn: source.required("role_arn", Some(env::SAGEMAKER_ROLE_ARN)),
            region: source
                .optional("region", Some(env::AWS_REGION))
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
        };
        source.finish()?;
        Ok(request)
    }
}

/// Hex SHA-256 of a published configuration body.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub version_number: i32,
    pub deployment_number: i32,
    pub config_keys: Vec<String>,
    pub deployment_state: Option<String>,
    pub used_fallback: bool,
    pub event_time: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectDeployResult {
    pub version_number: i32,
    pub deployment_number: i32,
    pub content_hash: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParameterResult {
    #[serde(rename = "PhysicalResourceId")]
    pub physical_resource_id: String,
    #[serde(rename = "Data")]
    pub data: ParameterData,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParameterData {
    #[serde(rename = "ParameterValue")]
    pub parameter_value: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingTriggerResult {
    pub training_job_name: String,
    pub output_s3_uri: String,
    pub version: u64,
    pub training_job_arn: Option<String>,
}
