use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use config_sync_core::contract::ParameterRequest;
use config_sync_core::deployment::{DeploymentRequest, DeploymentState, DeploymentTarget};
use config_sync_core::error::SyncError;
use config_sync_core::storage_keys::object_uri;
use config_sync_core::training::TrainingJobSpec;
use config_sync_lambda::adapters::config_session::ConfigSession;
use config_sync_lambda::adapters::distribution::ConfigDistribution;
use config_sync_lambda::adapters::object_store::ObjectStore;
use config_sync_lambda::adapters::training_jobs::TrainingJobLauncher;
use config_sync_lambda::watcher::PollClock;
use serde_json::Value;

/// In-memory bucket that records every call.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, key: &str, document: Value) -> Self {
        self.seed(key, document.to_string().as_bytes());
        self
    }

    pub fn seed(&self, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body.to_vec());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SyncError> {
        self.record(format!("get {key}"));
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::not_found(object_uri(bucket, key)))
    }

    fn list_keys(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>, SyncError> {
        self.record(format!("list {prefix}"));
        Ok(self
            .objects
            .lock()
            .expect("poisoned mutex")
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVersion {
    pub application_id: String,
    pub configuration_profile_id: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Versioned store plus scripted deployment states.
pub struct RecordingDistribution {
    versions: Mutex<Vec<PublishedVersion>>,
    deployments: Mutex<Vec<DeploymentRequest>>,
    states: Mutex<Vec<DeploymentState>>,
    status_calls: Mutex<usize>,
    reject_publish: bool,
    reject_deployment: bool,
}

impl RecordingDistribution {
    /// `states` are returned in order; the last one repeats.
    pub fn new(states: &[&str]) -> Self {
        let states = states
            .iter()
            .rev()
            .map(|label| DeploymentState::parse(label))
            .collect();
        Self {
            versions: Mutex::new(Vec::new()),
            deployments: Mutex::new(Vec::new()),
            states: Mutex::new(states),
            status_calls: Mutex::new(0),
            reject_publish: false,
            reject_deployment: false,
        }
    }

    pub fn rejecting_publish(mut self) -> Self {
        self.reject_publish = true;
        self
    }

    pub fn rejecting_deployment(mut self) -> Self {
        self.reject_deployment = true;
        self
    }

    pub fn versions(&self) -> Vec<PublishedVersion> {
        self.versions.lock().expect("poisoned mutex").clone()
    }

    pub fn deployments(&self) -> Vec<DeploymentRequest> {
        self.deployments.lock().expect("poisoned mutex").clone()
    }

    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock().expect("poisoned mutex")
    }

    pub fn latest_content(&self) -> Option<Vec<u8>> {
        self.versions()
            .last()
            .map(|version| version.content.clone())
    }

    pub fn total_calls(&self) -> usize {
        self.versions().len() + self.deployments().len() + self.status_calls()
    }
}

impl ConfigDistribution for RecordingDistribution {
    fn create_hosted_version(
        &self,
        application_id: &str,
        configuration_profile_id: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<i32, SyncError> {
        if self.reject_publish {
            return Err(SyncError::Publish("ServiceQuotaExceeded".to_string()));
        }
        let mut versions = self.versions.lock().expect("poisoned mutex");
        versions.push(PublishedVersion {
            application_id: application_id.to_string(),
            configuration_profile_id: configuration_profile_id.to_string(),
            content: content.to_vec(),
            content_type: content_type.to_string(),
        });
        Ok(versions.len() as i32)
    }

    fn start_deployment(&self, request: &DeploymentRequest) -> Result<i32, SyncError> {
        if self.reject_deployment {
            return Err(SyncError::DeploymentStart(
                "ConflictException: deployment already in progress".to_string(),
            ));
        }
        let mut deployments = self.deployments.lock().expect("poisoned mutex");
        deployments.push(request.clone());
        Ok(deployments.len() as i32)
    }

    fn get_deployment_state(
        &self,
        _target: &DeploymentTarget,
    ) -> Result<DeploymentState, SyncError> {
        *self.status_calls.lock().expect("poisoned mutex") += 1;
        let mut states = self.states.lock().expect("poisoned mutex");
        if states.len() > 1 {
            Ok(states.pop().expect("non-empty script"))
        } else {
            Ok(states
                .last()
                .cloned()
                .unwrap_or(DeploymentState::Complete))
        }
    }
}

/// Serves whatever `content` holds for any token.
pub struct FakeSession {
    token: Option<String>,
    content: Vec<u8>,
    sessions: Mutex<Vec<ParameterRequest>>,
}

impl FakeSession {
    pub fn serving(content: &[u8]) -> Self {
        Self {
            token: Some("initial-token".to_string()),
            content: content.to_vec(),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn without_token() -> Self {
        Self {
            token: None,
            content: Vec::new(),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn sessions(&self) -> Vec<ParameterRequest> {
        self.sessions.lock().expect("poisoned mutex").clone()
    }
}

impl ConfigSession for FakeSession {
    fn start_session(&self, request: &ParameterRequest) -> Result<Option<String>, SyncError> {
        self.sessions
            .lock()
            .expect("poisoned mutex")
            .push(request.clone());
        Ok(self.token.clone())
    }

    fn latest_configuration(&self, token: &str) -> Result<Vec<u8>, SyncError> {
        assert_eq!(Some(token), self.token.as_deref());
        Ok(self.content.clone())
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    jobs: Mutex<Vec<TrainingJobSpec>>,
}

impl RecordingLauncher {
    pub fn jobs(&self) -> Vec<TrainingJobSpec> {
        self.jobs.lock().expect("poisoned mutex").clone()
    }
}

impl TrainingJobLauncher for RecordingLauncher {
    fn create_training_job(&self, spec: &TrainingJobSpec) -> Result<Option<String>, SyncError> {
        self.jobs.lock().expect("poisoned mutex").push(spec.clone());
        Ok(Some(format!(
            "arn:aws:sagemaker:us-east-1:123456789012:training-job/{}",
            spec.job_name
        )))
    }
}

/// Advances only when slept on.
#[derive(Default)]
pub struct FakeClock {
    now: Cell<Duration>,
}

impl PollClock for FakeClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

pub fn no_env(_: &str) -> Option<String> {
    None
}
