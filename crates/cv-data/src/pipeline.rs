//! Startup load: lookup, then metrics, then join, then boundaries
//!
//! Stages run strictly in sequence because the join needs the lookup. A
//! failing lookup, fetch or join stage aborts the load; nothing is retried.
//! Missing or unreadable boundaries only leave the map empty.

use std::path::Path;

use cv_core::StateRecord;
use tracing::{info, warn};

use crate::boundaries::RegionBoundaries;
use crate::config::DashboardConfig;
use crate::join::{join_records, DroppedRecord, JoinOutcome};
use crate::lookup::StateCodeLookup;
use crate::sources::{FileMetricsSource, HttpMetricsSource, MetricsSource};
use crate::DataError;

/// Everything the dashboard needs to render
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub source_name: String,
    pub records: Vec<StateRecord>,
    pub dropped: Vec<DroppedRecord>,
    pub boundaries: RegionBoundaries,
}

/// The metrics source a config asks for: a snapshot file if set, the API otherwise
pub fn metrics_source(config: &DashboardConfig) -> Result<Box<dyn MetricsSource>, DataError> {
    match &config.snapshot_path {
        Some(path) => Ok(Box::new(FileMetricsSource::new(path.clone()))),
        None => Ok(Box::new(HttpMetricsSource::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )?)),
    }
}

pub async fn load_dashboard(config: &DashboardConfig) -> Result<LoadedData, DataError> {
    config.validate()?;
    let source = metrics_source(config)?;
    load_from_source(source.as_ref(), &config.state_codes_path, &config.boundaries_path).await
}

pub async fn load_from_source(
    source: &dyn MetricsSource,
    state_codes_path: &Path,
    boundaries_path: &Path,
) -> Result<LoadedData, DataError> {
    let lookup: StateCodeLookup = StateCodeLookup::from_path(state_codes_path).await?;

    let raw = source.fetch_states().await?;
    let fetched = raw.len();

    let JoinOutcome { records, dropped } = join_records(raw, &lookup);
    if records.is_empty() {
        warn!(fetched, "No state records survived the join");
    }

    let boundaries = match RegionBoundaries::from_path(boundaries_path).await {
        Ok(boundaries) => boundaries,
        Err(e) => {
            warn!(error = %e, "Region boundaries unavailable, the map will be empty");
            RegionBoundaries::default()
        }
    };

    info!(
        source = source.source_name(),
        records = records.len(),
        dropped = dropped.len(),
        regions = boundaries.len(),
        "Dashboard data loaded"
    );

    Ok(LoadedData {
        source_name: source.source_name().to_string(),
        records,
        dropped,
        boundaries,
    })
}
