//! Shared configuration library for Pinfold.
//!
//! Centralizes config loading and validation so the CLI and any embedding
//! application share a single source of truth for defaults and validation
//! rules. Values come from the process environment, with `.env` files picked
//! up via dotenvy when present.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoadError, ConfigLoader};
pub use models::{Config, HttpConfig, SearchConfig};
pub use validation::ConfigGuardRailError;
