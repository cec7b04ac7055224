use thiserror::Error;

/// Internal lookup failures. Callers of [`crate::Geocoder::resolve`]
/// never see these; they are logged and mapped to "not found".
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("non-numeric coordinate: {0}")]
    Coordinate(#[from] std::num::ParseFloatError),
}
