use meldo_core::models::location::Location;

use crate::Geocoder;

/// One place in the static regional lookup table.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub zip: &'static str,
}

/// Towns and municipalities of the Saalekreis demo region.
const SAALEKREIS: &[Place] = &[
    Place { name: "Merseburg", lat: 51.3544, lng: 11.9928, zip: "06217" },
    Place { name: "Leuna", lat: 51.3170, lng: 12.0150, zip: "06237" },
    Place { name: "Bad Dürrenberg", lat: 51.2939, lng: 12.0658, zip: "06231" },
    Place { name: "Schkopau", lat: 51.3906, lng: 11.9550, zip: "06258" },
    Place { name: "Braunsbedra", lat: 51.2843, lng: 11.8886, zip: "06242" },
    Place { name: "Mücheln", lat: 51.2980, lng: 11.8060, zip: "06249" },
    Place { name: "Bad Lauchstädt", lat: 51.3856, lng: 11.8692, zip: "06246" },
    Place { name: "Querfurt", lat: 51.3794, lng: 11.6006, zip: "06268" },
    Place { name: "Landsberg", lat: 51.5278, lng: 12.1608, zip: "06188" },
    Place { name: "Teutschenthal", lat: 51.4500, lng: 11.8000, zip: "06179" },
];

/// Exact, case-insensitive lookup against a fixed table. The offline
/// default when the live geocoder is disabled.
pub struct Gazetteer {
    places: &'static [Place],
}

impl Gazetteer {
    pub fn saalekreis() -> Self {
        Self { places: SAALEKREIS }
    }

    pub fn places(&self) -> &[Place] {
        self.places
    }
}

impl Geocoder for Gazetteer {
    fn resolve(&self, query: &str) -> Option<Location> {
        // Unicode-aware: the table has umlauts.
        let needle = query.trim().to_lowercase();
        self.places
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
            .map(|p| Location::new(p.lat, p.lng, p.name, p.zip))
    }
}
