//! Data loading for the dashboard: static lookups, remote metrics and the
//! join that turns them into [`cv_core::StateRecord`]s

pub mod boundaries;
pub mod config;
pub mod join;
pub mod lookup;
pub mod pipeline;
pub mod schema;
pub mod sources;

use std::path::PathBuf;

use thiserror::Error;

// Re-exports
pub use boundaries::{RegionBoundaries, RegionShape};
pub use config::DashboardConfig;
pub use join::{join_records, DropReason, DroppedRecord, JoinOutcome};
pub use lookup::StateCodeLookup;
pub use pipeline::{load_dashboard, LoadedData};
pub use sources::{FileMetricsSource, HttpMetricsSource, MetricsSource};

/// Errors that can occur while loading dashboard data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid state code lookup: {0}")]
    Lookup(String),

    #[error("invalid region boundaries: {0}")]
    Boundaries(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a remote fetch failed
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        DataError::Json {
            origin: origin.into(),
            source,
        }
    }

    /// Whether the failure came from the remote metrics endpoint
    pub fn is_network(&self) -> bool {
        matches!(self, DataError::Network { .. })
    }
}

/// Read a whole text resource from disk
pub(crate) async fn read_resource(path: &std::path::Path) -> Result<String, DataError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DataError::io(path, e))
}
