use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use meldo_core::models::location::Location;

use crate::Geocoder;
use crate::error::GeocodeError;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Remote free-text lookup against a Nominatim-style search endpoint,
/// scoped to the configured region. Only the first result is consumed.
pub struct Nominatim {
    agent: ureq::Agent,
    endpoint: String,
    region: String,
}

impl Nominatim {
    pub fn new(endpoint: impl Into<String>, region: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into(),
            region: region.into(),
        }
    }

    fn lookup(&self, query: &str) -> Result<Option<Location>, GeocodeError> {
        let scoped = format!("{}, {}", query.trim(), self.region);
        let body = self
            .agent
            .get(&self.endpoint)
            .query("q", &scoped)
            .query("format", "json")
            .query("addressdetails", "1")
            .query("limit", "1")
            .query("countrycodes", "de")
            .header("user-agent", "meldo-geocode")
            .call()?
            .body_mut()
            .read_to_string()?;
        parse_first(&body)
    }
}

impl Geocoder for Nominatim {
    fn resolve(&self, query: &str) -> Option<Location> {
        match self.lookup(query) {
            Ok(found) => found,
            Err(e) => {
                // Degrade to not-found; the user can retry.
                warn!(query, error = %e, "remote geocoder lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    address: SearchAddress,
}

#[derive(Debug, Default, Deserialize)]
struct SearchAddress {
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
}

impl SearchAddress {
    /// The most specific populated place name available.
    fn area(&self) -> String {
        [
            &self.suburb,
            &self.village,
            &self.town,
            &self.city,
            &self.municipality,
        ]
        .into_iter()
        .find_map(|f| f.clone())
        .unwrap_or_default()
    }
}

/// Map the first element of a search response to a [`Location`]. An
/// empty result array is not-found, not an error.
pub fn parse_first(body: &str) -> Result<Option<Location>, GeocodeError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)?;
    let Some(hit) = hits.first() else {
        return Ok(None);
    };
    let lat: f64 = hit.lat.parse()?;
    let lng: f64 = hit.lon.parse()?;
    Ok(Some(Location::new(
        lat,
        lng,
        hit.address.area(),
        hit.address.postcode.clone().unwrap_or_default(),
    )))
}
