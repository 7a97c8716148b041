use crate::models::RawProfile;
use std::future::Future;
use thiserror::Error;

/// Errors raised by storage collaborators
///
/// These are propagated to the caller unmodified; there is no retry policy
/// in the matching pipeline.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Unauthorized: invalid API key or project")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supplies the population snapshot for one matching invocation
pub trait ProfileSource: Send + Sync {
    /// Fetch every active profile as a raw record
    fn fetch_active_profiles(&self) -> impl Future<Output = Result<Vec<RawProfile>, StoreError>> + Send;

    /// Check whether the backing store is reachable
    fn health_check(&self) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
