//! meldo-geocode
//!
//! Address → coordinates resolution, constrained to the administrative
//! region. Two interchangeable strategies: a static regional gazetteer
//! and a remote Nominatim-style lookup. Lookup failures never propagate;
//! everything degrades to "not found".

pub mod error;
pub mod gazetteer;
pub mod nominatim;

pub use error::GeocodeError;
pub use gazetteer::Gazetteer;
pub use nominatim::Nominatim;

use meldo_core::models::location::Location;

/// A strategy for resolving a free-text address inside the region.
pub trait Geocoder {
    /// `None` means not found, including degraded remote failures.
    fn resolve(&self, query: &str) -> Option<Location>;
}

/// Pick the resolver for the `live_geocoder` runtime flag.
pub fn resolver(live: bool, endpoint: &str, region: &str) -> Box<dyn Geocoder> {
    if live {
        Box::new(Nominatim::new(endpoint, region))
    } else {
        Box::new(Gazetteer::saalekreis())
    }
}
