/// Reverse-geocode result consumed from the external lookup service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placemark {
    pub locality: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
    pub name: Option<String>,
}

impl Placemark {
    /// Composes the display string stored in a pin's `place_name`:
    /// `"locality, administrative_area, country"`, with the locality falling
    /// back to `"unknown"` and the other segments appended only when present.
    pub fn display_name(&self) -> String {
        let mut name = self
            .locality
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        if let Some(area) = &self.administrative_area {
            name.push_str(", ");
            name.push_str(area);
        }
        if let Some(country) = &self.country {
            name.push_str(", ");
            name.push_str(country);
        }
        name
    }
}
