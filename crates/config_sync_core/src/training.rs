//! Training configuration model and job-spec construction.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SyncError;
use crate::merge::TRAINING_SECTION;
use crate::storage_keys::{training_job_name, versioned_output_uri};

pub const TRAINING_INPUT_MODE: &str = "File";
pub const TRAINING_PROGRAM: &str = "train.py";

const WHAT: &str = "training configuration";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingSection {
    #[serde(rename = "JobNamePrefix")]
    pub job_name_prefix: String,
    #[serde(rename = "Parameters")]
    pub parameters: TrainingParameters,
    #[serde(rename = "Resources")]
    pub resources: TrainingResources,
    #[serde(rename = "Container")]
    pub container: TrainingContainer,
    #[serde(rename = "Output")]
    pub output: TrainingOutput,
}

/// Hyperparameters; numeric values are kept as raw JSON and stringified on submit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingParameters {
    pub dataset: String,
    pub device: String,
    pub num_epochs: Value,
    pub batch_size: Value,
    pub embed_dim: Value,
    pub learning_rate: Value,
    pub save_model_path: String,
    pub dictionary_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingResources {
    pub instance_type: String,
    pub instance_count: i32,
    pub volume_size_gb: i32,
    pub max_runtime_seconds: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingContainer {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingOutput {
    pub s3_path_prefix: String,
}

impl TrainingSection {
    pub fn from_document(document: &Map<String, Value>) -> Result<Self, SyncError> {
        let section = document
            .get(TRAINING_SECTION)
            .ok_or_else(|| SyncError::decode(WHAT, "missing `Training` section"))?;
        serde_json::from_value(section.clone()).map_err(|error| SyncError::decode(WHAT, error))
    }
}

/// Fully-resolved `CreateTrainingJob` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingJobSpec {
    pub job_name: String,
    pub role_arn: String,
    pub image: String,
    pub input_mode: String,
    pub output_s3_uri: String,
    pub instance_type: String,
    pub instance_count: i32,
    pub volume_size_gb: i32,
    pub max_runtime_seconds: i32,
    pub hyperparameters: BTreeMap<String, String>,
    pub environment: BTreeMap<String, String>,
}

impl TrainingJobSpec {
    pub fn build(
        section: &TrainingSection,
        bucket: &str,
        role_arn: &str,
        region: &str,
        version: u64,
    ) -> Self {
        let params = &section.parameters;
        let hyperparameters: BTreeMap<String, String> = [
            ("dataset", params.dataset.clone()),
            ("device", params.device.clone()),
            ("num_epochs", hyperparameter_text(&params.num_epochs)),
            ("batch_size", hyperparameter_text(&params.batch_size)),
            ("embed_dim", hyperparameter_text(&params.embed_dim)),
            ("learning_rate", hyperparameter_text(&params.learning_rate)),
            ("save_model_path", params.save_model_path.clone()),
            ("dictionary_path", params.dictionary_path.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        let environment: BTreeMap<String, String> = [
            ("SAGEMAKER_PROGRAM", TRAINING_PROGRAM.to_string()),
            ("SAGEMAKER_REGION", region.to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        Self {
            job_name: training_job_name(&section.job_name_prefix, version),
            role_arn: role_arn.to_string(),
            image: section.container.image.clone(),
            input_mode: TRAINING_INPUT_MODE.to_string(),
            output_s3_uri: versioned_output_uri(bucket, &section.output.s3_path_prefix, version),
            instance_type: section.resources.instance_type.clone(),
            instance_count: section.resources.instance_count,
            volume_size_gb: section.resources.volume_size_gb,
            max_runtime_seconds: section.resources.max_runtime_seconds,
            hyperparameters,
            environment,
        }
    }
}

fn hyperparameter_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn training_document() -> Map<String, Value> {
        json!({
            "Training": {
                "JobNamePrefix": "model-a",
                "Parameters": {
                    "dataset": "ag_news",
                    "device": "cpu",
                    "num_epochs": 5,
                    "batch_size": 64,
                    "embed_dim": 32,
                    "learning_rate": 4.0,
                    "save_model_path": "/opt/ml/model/model.pth",
                    "dictionary_path": "/opt/ml/model/vocab.pth"
                },
                "Resources": {
                    "instance_type": "ml.m5.large",
                    "instance_count": 1,
                    "volume_size_gb": 30,
                    "max_runtime_seconds": 3600
                },
                "Container": {"image": "123.dkr.ecr.us-east-1.amazonaws.com/train:latest"},
                "Output": {"s3_path_prefix": "models/model-a"}
            }
        })
        .as_object()
        .cloned()
        .expect("fixture is an object")
    }

    #[test]
    fn builds_versioned_job_spec() {
        let section =
            TrainingSection::from_document(&training_document()).expect("section should parse");
        let spec = TrainingJobSpec::build(&section, "artifacts", "arn:role", "eu-west-1", 4);

        assert_eq!(spec.job_name, "model-a-v4");
        assert_eq!(spec.output_s3_uri, "s3://artifacts/models/model-a/v4/");
        assert_eq!(spec.input_mode, "File");
        assert_eq!(spec.hyperparameters["num_epochs"], "5");
        assert_eq!(spec.hyperparameters["learning_rate"], "4.0");
        assert_eq!(spec.hyperparameters["dataset"], "ag_news");
        assert_eq!(spec.environment["SAGEMAKER_PROGRAM"], "train.py");
        assert_eq!(spec.environment["SAGEMAKER_REGION"], "eu-west-1");
    }

    #[test]
    fn missing_section_is_decode_error() {
        let error = TrainingSection::from_document(&Map::new()).expect_err("section is required");
        assert_eq!(error.kind(), "decode_error");
    }

    #[test]
    fn incomplete_resources_are_decode_error() {
        let mut document = training_document();
        document["Training"]["Resources"] = json!({"instance_type": "ml.m5.large"});

        let error = TrainingSection::from_document(&document).expect_err("resources incomplete");
        assert!(error.to_string().contains("training configuration"));
    }
}
