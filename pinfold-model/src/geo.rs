use std::fmt;

/// Half-width of the search rectangle around a pin, in degrees of longitude.
pub const SEARCH_BBOX_HALF_WIDTH: f64 = 1.0;
/// Half-height of the search rectangle around a pin, in degrees of latitude.
pub const SEARCH_BBOX_HALF_HEIGHT: f64 = 1.0;

const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// Clamped rectangular search region surrounding a pin's coordinates.
///
/// Rendered as `minLon,minLat,maxLon,maxLat` for the search API's `bbox`
/// query parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Builds the search rectangle around `(latitude, longitude)`, with each
    /// bound clamped to the valid coordinate range.
    pub fn around(latitude: f64, longitude: f64) -> Self {
        BoundingBox {
            min_lon: (longitude - SEARCH_BBOX_HALF_WIDTH).max(LON_RANGE.0),
            min_lat: (latitude - SEARCH_BBOX_HALF_HEIGHT).max(LAT_RANGE.0),
            max_lon: (longitude + SEARCH_BBOX_HALF_WIDTH).min(LON_RANGE.1),
            max_lat: (latitude + SEARCH_BBOX_HALF_HEIGHT).min(LAT_RANGE.1),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
