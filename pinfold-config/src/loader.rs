use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{
    Config, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PER_PAGE, HttpConfig,
    SearchConfig, default_endpoint,
};
use crate::validation::validate;

pub const ENV_API_KEY: &str = "PINFOLD_API_KEY";
pub const ENV_ENDPOINT: &str = "PINFOLD_ENDPOINT";
pub const ENV_PER_PAGE: &str = "PINFOLD_PER_PAGE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PINFOLD_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("missing required environment variable {0}")]
    MissingKey(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error(transparent)]
    GuardRail(#[from] crate::validation::ConfigGuardRailError),
}

/// Loads [`Config`] from the process environment.
///
/// A `.env` file in the working directory is merged in first (existing
/// process variables win, dotenvy's default behavior).
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load() -> Result<Config, ConfigLoadError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "merged .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads from an arbitrary key lookup; `load()` wires this to the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or(ConfigLoadError::MissingKey(ENV_API_KEY))?;

        let endpoint = match lookup(ENV_ENDPOINT) {
            Some(raw) => Url::parse(&raw).map_err(|err| {
                ConfigLoadError::InvalidValue {
                    key: ENV_ENDPOINT,
                    reason: err.to_string(),
                }
            })?,
            None => default_endpoint(),
        };

        let per_page = parse_or(&lookup, ENV_PER_PAGE, DEFAULT_PER_PAGE)?;
        let timeout_secs = parse_or(
            &lookup,
            ENV_HTTP_TIMEOUT_SECS,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        let config = Config {
            search: SearchConfig {
                api_key,
                endpoint,
                per_page,
            },
            http: HttpConfig { timeout_secs },
        };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
) -> Result<T, ConfigLoadError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.parse().map_err(|err: T::Err| {
            ConfigLoadError::InvalidValue {
                key,
                reason: err.to_string(),
            }
        }),
        None => Ok(default),
    }
}
