//! SDK-backed collaborators.
//!
//! Handlers are synchronous, so each call bridges onto the current Tokio
//! runtime with `block_in_place`. That requires the multi-threaded runtime the
//! Lambda binaries start with `#[tokio::main]`.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_appconfig::primitives::Blob;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_sagemaker::types::{
    AlgorithmSpecification, OutputDataConfig, ResourceConfig, StoppingCondition,
    TrainingInputMode, TrainingInstanceType,
};
use config_sync_core::contract::ParameterRequest;
use config_sync_core::deployment::{DeploymentRequest, DeploymentState, DeploymentTarget};
use config_sync_core::error::SyncError;
use config_sync_core::storage_keys::object_uri;
use config_sync_core::training::TrainingJobSpec;

use crate::adapters::config_session::ConfigSession;
use crate::adapters::distribution::ConfigDistribution;
use crate::adapters::object_store::ObjectStore;
use crate::adapters::training_jobs::TrainingJobLauncher;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SyncError> {
        let uri = object_uri(bucket, key);
        let request = self.client.get_object().bucket(bucket).key(key);

        block_on(async move {
            let output = match request.send().await {
                Ok(output) => output,
                Err(error) => {
                    if error
                        .as_service_error()
                        .is_some_and(GetObjectError::is_no_such_key)
                    {
                        return Err(SyncError::not_found(uri));
                    }
                    return Err(SyncError::transport(
                        format!("failed to get {uri}"),
                        aws_sdk_s3::error::DisplayErrorContext(&error),
                    ));
                }
            };

            let body = output.body.collect().await.map_err(|error| {
                SyncError::transport(format!("failed to read body of {uri}"), error)
            })?;
            Ok(body.into_bytes().to_vec())
        })
    }

    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, SyncError> {
        let uri = object_uri(bucket, prefix);
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        block_on(async move {
            let mut keys = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|error| {
                    SyncError::transport(
                        format!("failed to list {uri}"),
                        aws_sdk_s3::error::DisplayErrorContext(&error),
                    )
                })?;
                keys.extend(
                    page.contents()
                        .iter()
                        .filter_map(|object| object.key())
                        .map(str::to_string),
                );
            }
            Ok(keys)
        })
    }
}

#[derive(Clone)]
pub struct AppConfigDistribution {
    client: aws_sdk_appconfig::Client,
}

impl AppConfigDistribution {
    pub fn new(client: aws_sdk_appconfig::Client) -> Self {
        Self { client }
    }
}

impl ConfigDistribution for AppConfigDistribution {
    fn create_hosted_version(
        &self,
        application_id: &str,
        configuration_profile_id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<i32, SyncError> {
        let request = self
            .client
            .create_hosted_configuration_version()
            .application_id(application_id)
            .configuration_profile_id(configuration_profile_id)
            .content(Blob::new(content.to_vec()))
            .content_type(content_type);

        block_on(async move {
            request
                .send()
                .await
                .map(|output| output.version_number())
                .map_err(|error| {
                    SyncError::Publish(
                        aws_sdk_appconfig::error::DisplayErrorContext(&error).to_string(),
                    )
                })
        })
    }

    fn start_deployment(&self, request: &DeploymentRequest) -> Result<i32, SyncError> {
        let call = self
            .client
            .start_deployment()
            .application_id(&request.application_id)
            .environment_id(&request.environment_id)
            .deployment_strategy_id(&request.deployment_strategy_id)
            .configuration_profile_id(&request.configuration_profile_id)
            .configuration_version(request.configuration_version.to_string())
            .description(&request.description);

        block_on(async move {
            call.send()
                .await
                .map(|output| output.deployment_number())
                .map_err(|error| {
                    SyncError::DeploymentStart(
                        aws_sdk_appconfig::error::DisplayErrorContext(&error).to_string(),
                    )
                })
        })
    }

    fn get_deployment_state(
        &self,
        target: &DeploymentTarget,
    ) -> Result<DeploymentState, SyncError> {
        let call = self
            .client
            .get_deployment()
            .application_id(&target.application_id)
            .environment_id(&target.environment_id)
            .deployment_number(target.deployment_number);
        let context = format!(
            "failed to get status of deployment {}",
            target.deployment_number
        );

        block_on(async move {
            let output = call.send().await.map_err(|error| {
                SyncError::transport(
                    context,
                    aws_sdk_appconfig::error::DisplayErrorContext(&error),
                )
            })?;
            Ok(output
                .state()
                .map(|state| DeploymentState::parse(state.as_str()))
                .unwrap_or_else(|| DeploymentState::Other("UNKNOWN".to_string())))
        })
    }
}

#[derive(Clone)]
pub struct AppConfigDataSession {
    client: aws_sdk_appconfigdata::Client,
}

impl AppConfigDataSession {
    pub fn new(client: aws_sdk_appconfigdata::Client) -> Self {
        Self { client }
    }
}

impl ConfigSession for AppConfigDataSession {
    fn start_session(&self, request: &ParameterRequest) -> Result<Option<String>, SyncError> {
        let call = self
            .client
            .start_configuration_session()
            .application_identifier(&request.application_id)
            .environment_identifier(&request.environment_id)
            .configuration_profile_identifier(&request.configuration_profile_id)
            .required_minimum_poll_interval_in_seconds(request.min_poll_interval_seconds);

        block_on(async move {
            call.send()
                .await
                .map(|output| output.initial_configuration_token().map(str::to_string))
                .map_err(|error| {
                    SyncError::transport(
                        "failed to start configuration session",
                        aws_sdk_appconfigdata::error::DisplayErrorContext(&error),
                    )
                })
        })
    }

    fn latest_configuration(&self, token: &str) -> Result<Vec<u8>, SyncError> {
        let call = self
            .client
            .get_latest_configuration()
            .configuration_token(token);

        block_on(async move {
            call.send()
                .await
                .map(|output| {
                    output
                        .configuration()
                        .map(|blob| blob.as_ref().to_vec())
                        .unwrap_or_default()
                })
                .map_err(|error| {
                    SyncError::transport(
                        "failed to get latest configuration",
                        aws_sdk_appconfigdata::error::DisplayErrorContext(&error),
                    )
                })
        })
    }
}

#[derive(Clone)]
pub struct SageMakerTrainingJobs {
    client: aws_sdk_sagemaker::Client,
}

impl SageMakerTrainingJobs {
    pub fn new(client: aws_sdk_sagemaker::Client) -> Self {
        Self { client }
    }
}

impl TrainingJobLauncher for SageMakerTrainingJobs {
    fn create_training_job(&self, spec: &TrainingJobSpec) -> Result<Option<String>, SyncError> {
        let algorithm = AlgorithmSpecification::builder()
            .training_image(&spec.image)
            .training_input_mode(TrainingInputMode::from(spec.input_mode.as_str()))
            .build();
        let output = OutputDataConfig::builder()
            .s3_output_path(&spec.output_s3_uri)
            .build();
        let resources = ResourceConfig::builder()
            .instance_type(TrainingInstanceType::from(spec.instance_type.as_str()))
            .instance_count(spec.instance_count)
            .volume_size_in_gb(spec.volume_size_gb)
            .build();
        let stopping = StoppingCondition::builder()
            .max_runtime_in_seconds(spec.max_runtime_seconds)
            .build();

        let hyperparameters: HashMap<String, String> = spec
            .hyperparameters
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let environment: HashMap<String, String> = spec
            .environment
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let call = self
            .client
            .create_training_job()
            .training_job_name(&spec.job_name)
            .algorithm_specification(algorithm)
            .role_arn(&spec.role_arn)
            .output_data_config(output)
            .resource_config(resources)
            .stopping_condition(stopping)
            .set_hyper_parameters(Some(hyperparameters))
            .set_environment(Some(environment));
        let context = format!("failed to create training job {}", spec.job_name);

        block_on(async move {
            call.send()
                .await
                .map(|output| output.training_job_arn().map(str::to_string))
                .map_err(|error| {
                    SyncError::transport(
                        context,
                        aws_sdk_sagemaker::error::DisplayErrorContext(&error),
                    )
                })
        })
    }
}
