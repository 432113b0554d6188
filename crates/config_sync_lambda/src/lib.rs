//! AWS-oriented adapters and handlers for the configuration automation flows.
//!
//! This crate owns runtime integration details (Lambda handlers, SDK-backed
//! collaborators, the deployment watcher, logging, and settings). Domain
//! contracts and decision logic come from `config_sync_core`.

pub mod adapters;
pub mod handlers;
pub mod loader;
pub mod logging;
pub mod response;
pub mod settings;
pub mod watcher;
