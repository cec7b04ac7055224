use thiserror::Error;

/// User-visible action failures. None of these mutate state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("not allowed: {0}")]
    Forbidden(String),

    #[error("no report with id {0}")]
    ReportNotFound(i64),

    #[error("already subscribed to {kind} \"{value}\"")]
    DuplicateSubscription { kind: String, value: String },

    #[error("no subscription at index {0}")]
    SubscriptionNotFound(usize),
}
