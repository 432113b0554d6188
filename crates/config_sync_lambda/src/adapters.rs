//! Collaborator seams between handlers and the managed services.
//!
//! Handlers depend only on these traits; `aws` holds the SDK-backed
//! implementations used by the Lambda binaries.

pub mod aws;
pub mod config_session;
pub mod distribution;
pub mod object_store;
pub mod training_jobs;
