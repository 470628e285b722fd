use thiserror::Error;

use crate::models::Config;

/// Hard validation failures that make a loaded config unusable.
#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("search API key must not be empty")]
    EmptyApiKey,

    #[error("per-page result limit must be at least 1")]
    ZeroPerPage,

    #[error("HTTP timeout must be at least 1 second")]
    ZeroTimeout,
}

pub fn validate(config: &Config) -> Result<(), ConfigGuardRailError> {
    if config.search.api_key.trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyApiKey);
    }
    if config.search.per_page == 0 {
        return Err(ConfigGuardRailError::ZeroPerPage);
    }
    if config.http.timeout_secs == 0 {
        return Err(ConfigGuardRailError::ZeroTimeout);
    }
    Ok(())
}
