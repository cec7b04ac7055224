use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown category: {0}")]
    InvalidCategory(String),

    #[error("unknown status: {0}")]
    InvalidStatus(String),

    #[error("unknown subscription kind: {0}")]
    InvalidSubscriptionKind(String),
}
