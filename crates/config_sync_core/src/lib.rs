//! Shared configuration-automation domain primitives.
//!
//! This crate owns request contracts, the error taxonomy, and the small pieces
//! of decision logic (fallback merge, dot-path lookup, output versioning). It
//! intentionally excludes AWS SDK and Lambda runtime concerns, which live in
//! `config_sync_lambda`.

pub mod contract;
pub mod deployment;
pub mod error;
pub mod lookup;
pub mod merge;
pub mod storage_keys;
pub mod training;
