use config_sync_core::error::SyncError;
use config_sync_core::merge::merge_training_section;
use config_sync_core::storage_keys::{
    object_uri, FALLBACK_BASE_CONFIG_KEY, FALLBACK_TRAINING_CONFIG_KEY,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::adapters::object_store::ObjectStore;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub document: Map<String, Value>,
    pub used_fallback: bool,
}

/// Fetches `bucket/key` and decodes it as a UTF-8 JSON object.
pub fn load_document(
    store: &impl ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<Map<String, Value>, SyncError> {
    let bytes = store.get_object(bucket, key)?;
    let document = decode_document(&bytes, &object_uri(bucket, key))?;
    info!(
        event = "config_loaded",
        uri = %object_uri(bucket, key),
        top_level_keys = document.len(),
    );
    Ok(document)
}

/// Like [`load_document`], but rebuilds the document from the base and
/// training configs when the primary key does not exist.
pub fn load_with_fallback(
    store: &impl ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<LoadedConfig, SyncError> {
    match load_document(store, bucket, key) {
        Ok(document) => Ok(LoadedConfig {
            document,
            used_fallback: false,
        }),
        Err(error) if error.is_not_found() => {
            warn!(
                event = "config_missing",
                uri = %object_uri(bucket, key),
                "primary configuration missing; merging base and training configs"
            );
            let document = load_merged(store, bucket).map_err(SyncError::merge)?;
            info!(
                event = "config_merged",
                bucket,
                top_level_keys = document.len()
            );
            Ok(LoadedConfig {
                document,
                used_fallback: true,
            })
        }
        Err(error) => Err(error),
    }
}

fn load_merged(store: &impl ObjectStore, bucket: &str) -> Result<Map<String, Value>, SyncError> {
    let base = load_document(store, bucket, FALLBACK_BASE_CONFIG_KEY)?;
    let training = load_document(store, bucket, FALLBACK_TRAINING_CONFIG_KEY)?;
    merge_training_section(base, &training)
}

/// Decodes UTF-8 JSON bytes into a top-level object.
pub fn decode_document(bytes: &[u8], what: &str) -> Result<Map<String, Value>, SyncError> {
    let text = std::str::from_utf8(bytes).map_err(|error| SyncError::decode(what, error))?;
    match serde_json::from_str::<Value>(text).map_err(|error| SyncError::decode(what, error))? {
        Value::Object(document) => Ok(document),
        _ => Err(SyncError::decode(what, "top level must be a JSON object")),
    }
}
