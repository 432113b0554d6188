use config_sync_core::contract::ParameterRequest;
use config_sync_core::error::SyncError;

/// Data plane of the configuration-distribution service.
pub trait ConfigSession {
    /// Opens a session; `None` when the service returned no initial token.
    fn start_session(&self, request: &ParameterRequest) -> Result<Option<String>, SyncError>;

    /// Latest configuration bytes for a session token (empty when unchanged).
    fn latest_configuration(&self, token: &str) -> Result<Vec<u8>, SyncError>;
}
