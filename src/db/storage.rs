use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// The driver/url pair produced by a successful resolution.
///
/// Created per resolution and owned by the caller; nothing here is
/// persisted by the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConnection {
    pub driver: String,
    pub url: String,
}

/// Information returned from a successful connection test
#[derive(Debug, Clone)]
pub struct StorageInfo {
    pub engine_version: Option<String>,
    pub latency_ms: u64,
}

/// Core trait for storage backends
pub trait Storage: Send + Sync {
    /// Test if the backend is usable.
    fn test_connection(&self) -> Result<StorageInfo>;

    /// When the local data set was last refreshed, if ever.
    fn last_updated(&self) -> Result<Option<DateTime<Utc>>>;

    /// Record now as the refresh time and return it.
    ///
    /// The stamp is stored with second precision.
    fn mark_updated(&self) -> Result<DateTime<Utc>>;
}
