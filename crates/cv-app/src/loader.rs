//! Background startup load

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{error, info};

use cv_data::{load_dashboard, DashboardConfig, LoadedData};

/// Outcome of the load; errors are kept as display strings for the error screen
pub type LoadResult = Result<LoadedData, String>;

/// Shared slot the load task fills once and the frame loop drains
pub struct LoadSlot(Arc<Mutex<Option<LoadResult>>>);

impl LoadSlot {
    /// Start loading on the runtime; `on_done` runs after the slot is filled
    pub fn spawn(handle: &Handle, config: DashboardConfig, on_done: impl FnOnce() + Send + 'static) -> Self {
        let slot = Arc::new(Mutex::new(None));
        let result_slot = slot.clone();

        handle.spawn(async move {
            let result = match load_dashboard(&config).await {
                Ok(data) => {
                    info!(records = data.records.len(), "Startup load finished");
                    Ok(data)
                }
                Err(e) => {
                    error!(error = %e, "Startup load failed");
                    Err(e.to_string())
                }
            };
            *result_slot.lock() = Some(result);
            on_done();
        });

        Self(slot)
    }

    /// Take the result if the load has finished
    pub fn take_finished(&self) -> Option<LoadResult> {
        self.0.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;

    fn wait_for_load(config: DashboardConfig) -> (LoadSlot, tokio::runtime::Runtime) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let slot = LoadSlot::spawn(runtime.handle(), config, move || {
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(10)).unwrap();
        (slot, runtime)
    }

    #[test]
    fn test_failed_load_fills_slot_once() {
        let config = DashboardConfig {
            state_codes_path: PathBuf::from("/nonexistent/state_code.json"),
            snapshot_path: Some(PathBuf::from("/nonexistent/states.json")),
            ..DashboardConfig::default()
        };

        let (slot, _runtime) = wait_for_load(config);
        let message = slot.take_finished().unwrap().unwrap_err();
        assert!(message.contains("state_code.json"));
        assert!(slot.take_finished().is_none());
    }

    #[test]
    fn test_successful_load_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name);
        std::fs::write(path("codes.json"), r#"[{"Code": "WY", "State": "Wyoming"}]"#).unwrap();
        std::fs::write(
            path("states.json"),
            r#"[{"fips": "56", "state": "WY", "population": 578759,
                 "metrics": {"caseDensity": 20.5, "infectionRate": 1.1}}]"#,
        )
        .unwrap();
        std::fs::write(path("shapes.json"), r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

        let config = DashboardConfig {
            state_codes_path: path("codes.json"),
            boundaries_path: path("shapes.json"),
            snapshot_path: Some(path("states.json")),
            ..DashboardConfig::default()
        };

        let (slot, _runtime) = wait_for_load(config);
        let data = slot.take_finished().unwrap().unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].name, "Wyoming");
        assert!(data.boundaries.is_empty());
    }
}
