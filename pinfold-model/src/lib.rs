//! Core data model definitions shared across Pinfold crates.
#![allow(missing_docs)]

pub mod error;
pub mod geo;
pub mod ids;
pub mod pin;
pub mod place;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use geo::BoundingBox;
pub use ids::PinId;
pub use pin::{DEFAULT_CAPTION, PLACEHOLDER_IMAGE, Photo, Pin};
pub use place::Placemark;
