pub mod file_source;
pub mod http_source;

pub use file_source::FileMetricsSource;
pub use http_source::HttpMetricsSource;

use async_trait::async_trait;

use crate::schema::ApiStateRecord;
use crate::DataError;

/// Where per-state metrics come from
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the raw per-state records
    async fn fetch_states(&self) -> Result<Vec<ApiStateRecord>, DataError>;

    /// Human readable origin, safe to log
    fn source_name(&self) -> &str;
}
