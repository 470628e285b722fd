use async_trait::async_trait;
use pinfold_model::Placemark;

use crate::error::Result;

/// Port to the external reverse-geocoding lookup.
///
/// The engine queries it at most once per pin; `Ok(None)` means the location
/// could not be resolved and the pin keeps its empty place cache.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn lookup(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Placemark>>;
}

/// Geocoder that never resolves a placemark, for deployments without a
/// lookup service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeocoder;

#[async_trait]
impl ReverseGeocoder for NullGeocoder {
    async fn lookup(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Option<Placemark>> {
        Ok(None)
    }
}
