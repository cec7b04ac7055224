use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A geocoded position inside the administrative region.
///
/// `area` is the district/town name and `zip` the postal code; both may be
/// empty when the geocoder could not resolve them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub area: String,
    pub zip: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, area: impl Into<String>, zip: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            area: area.into(),
            zip: zip.into(),
        }
    }

    /// "lat,lng" with five decimals, the form used for free-text search
    /// and map permalinks.
    pub fn coordinate_string(&self) -> String {
        format!("{:.5},{:.5}", self.lat, self.lng)
    }
}
