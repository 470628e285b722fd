use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{ModelError, Result};
use crate::ids::PinId;

/// Caption applied when the upstream record carries no title.
pub const DEFAULT_CAPTION: &str = "No Title";

/// 1x1 transparent PNG used as every photo's image until its real bytes
/// arrive. Embedded so the engine does not depend on any asset catalog.
pub const PLACEHOLDER_IMAGE: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
    0x00, 0x1F, 0x15, 0xC4, 0x89, //
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A,
    0x2D, 0xB4, //
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND
    0xAE, 0x42, 0x60, 0x82,
];

/// A persisted geographic marker owning an ordered photo collection.
///
/// `place_name` and `address` are a memoized reverse-geocode cache: they are
/// populated at most once per pin and never re-queried afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pin {
    pub id: PinId,
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Pin {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Pin {
            id: PinId::new(),
            latitude,
            longitude,
            place_name: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    /// Like [`Pin::new`], rejecting coordinates outside the valid ranges.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError::InvalidCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError::InvalidCoordinate(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Pin::new(latitude, longitude))
    }
}

/// One persisted image record owned by exactly one pin, addressed by index.
///
/// `index` and `source_url` are assigned at creation and immutable; `image`
/// starts as [`PLACEHOLDER_IMAGE`] and is replaced exactly once when the
/// download succeeds. A failed download leaves the placeholder in place for
/// silent retry on the next reload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    pub pin_id: PinId,
    pub index: u32,
    pub caption: String,
    pub source_url: Url,
    pub image: Vec<u8>,
}

impl Photo {
    /// Creates a photo in the placeholder state.
    pub fn placeholder(
        pin_id: PinId,
        index: u32,
        caption: Option<String>,
        source_url: Url,
    ) -> Self {
        Photo {
            pin_id,
            index,
            caption: caption.unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            source_url,
            image: PLACEHOLDER_IMAGE.to_vec(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.image == PLACEHOLDER_IMAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_photo_defaults_caption() {
        let url = Url::parse("https://live.example.com/1234.jpg").unwrap();
        let photo = Photo::placeholder(PinId::new(), 0, None, url);
        assert_eq!(photo.caption, DEFAULT_CAPTION);
        assert!(photo.is_placeholder());
    }

    #[test]
    fn filled_photo_is_not_a_placeholder() {
        let url = Url::parse("https://live.example.com/1234.jpg").unwrap();
        let mut photo =
            Photo::placeholder(PinId::new(), 3, Some("dock".into()), url);
        photo.image = vec![0xFF, 0xD8, 0xFF];
        assert!(!photo.is_placeholder());
        assert_eq!(photo.caption, "dock");
    }

    #[test]
    fn new_pin_has_no_cached_place() {
        let pin = Pin::new(51.5, -0.12);
        assert!(pin.place_name.is_none());
        assert!(pin.address.is_none());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(Pin::try_new(90.5, 0.0).is_err());
        assert!(Pin::try_new(0.0, -180.5).is_err());
        assert!(Pin::try_new(90.0, 180.0).is_ok());
    }
}
