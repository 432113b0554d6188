pub const DEFAULT_SYNC_CONFIG_KEY: &str = "configs/model-config.json";
pub const FALLBACK_BASE_CONFIG_KEY: &str = "configs/model-config.json";
pub const FALLBACK_TRAINING_CONFIG_KEY: &str = "configs/model-training-config.json";
pub const DEFAULT_TRAINING_CONFIG_KEY: &str = "configs/model-training-config.json";

pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{}", key.trim_start_matches('/'))
}

/// Prefix listed when computing the next output version.
pub fn output_listing_prefix(s3_path_prefix: &str) -> String {
    let trimmed = s3_path_prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Extracts `N` from the first `v<N>` segment below `prefix`.
///
/// Keys outside the prefix, or without a version segment, yield `None`.
pub fn parse_output_version(prefix: &str, key: &str) -> Option<u64> {
    let listing_prefix = output_listing_prefix(prefix);
    let relative = key.strip_prefix(&listing_prefix)?;
    let (segment, _) = relative.split_once('/')?;
    let digits = segment.strip_prefix('v')?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `max(existing) + 1`, or `1` when no versioned output exists yet.
///
/// List-then-increment: two concurrent callers can compute the same version.
pub fn next_output_version<'a>(prefix: &str, keys: impl IntoIterator<Item = &'a str>) -> u64 {
    keys.into_iter()
        .filter_map(|key| parse_output_version(prefix, key))
        .max()
        .map_or(1, |latest| latest.saturating_add(1))
}

pub fn versioned_output_uri(bucket: &str, s3_path_prefix: &str, version: u64) -> String {
    let trimmed = s3_path_prefix.trim_matches('/');
    if trimmed.is_empty() {
        format!("s3://{bucket}/v{version}/")
    } else {
        format!("s3://{bucket}/{trimmed}/v{version}/")
    }
}

pub fn training_job_name(job_name_prefix: &str, version: u64) -> String {
    format!("{job_name_prefix}-v{version}")
}
