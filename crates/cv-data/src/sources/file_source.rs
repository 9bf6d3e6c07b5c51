use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::MetricsSource;
use crate::schema::{parse_states, ApiStateRecord};
use crate::DataError;

/// Metrics read from a saved `states.json` snapshot
pub struct FileMetricsSource {
    path: PathBuf,
    name: String,
}

impl FileMetricsSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl MetricsSource for FileMetricsSource {
    async fn fetch_states(&self) -> Result<Vec<ApiStateRecord>, DataError> {
        info!(path = %self.name, "Reading state metrics snapshot");
        let text = crate::read_resource(&self.path).await?;
        parse_states(&text, &self.name)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
