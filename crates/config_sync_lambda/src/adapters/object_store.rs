use config_sync_core::error::SyncError;

pub trait ObjectStore {
    /// Returns the object body, or `SyncError::NotFound` when the key is absent.
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SyncError>;

    /// Every key under `prefix`, across all listing pages.
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, SyncError>;
}
