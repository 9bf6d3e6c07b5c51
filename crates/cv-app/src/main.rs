//! Main application entry point

mod dashboard;
mod loader;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use egui::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cv_core::events::DataLoadFailed;
use cv_core::{BarMetric, EventBus};
use cv_data::DashboardConfig;
use cv_ui::{StatusLine, Theme};

use dashboard::Dashboard;
use loader::LoadSlot;

enum AppState {
    Loading,
    Ready(Box<Dashboard>),
    Failed(String),
}

/// Main application state
struct DashboardApp {
    /// Tokio runtime running the startup load
    _runtime: tokio::runtime::Runtime,

    loader: LoadSlot,
    state: AppState,
    event_bus: Arc<EventBus>,
    status: StatusLine,
    initial_metric: BarMetric,

    /// Where the metrics come from, for the loading and error screens
    source_label: String,
}

impl DashboardApp {
    fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime, config: DashboardConfig) -> Self {
        cv_ui::apply_theme(&cc.egui_ctx, &Theme::default());

        let event_bus = Arc::new(EventBus::new());
        let status = StatusLine::subscribe(&event_bus);

        let source_label = match &config.snapshot_path {
            Some(path) => path.display().to_string(),
            None => config.api_url.clone(),
        };
        let initial_metric = config.bar_metric;

        let ctx = cc.egui_ctx.clone();
        let loader = LoadSlot::spawn(runtime.handle(), config, move || ctx.request_repaint());

        Self {
            _runtime: runtime,
            loader,
            state: AppState::Loading,
            event_bus,
            status,
            initial_metric,
            source_label,
        }
    }

    fn poll_load(&mut self) {
        if !matches!(self.state, AppState::Loading) {
            return;
        }
        let Some(result) = self.loader.take_finished() else {
            return;
        };

        self.state = match result {
            Ok(data) => AppState::Ready(Box::new(Dashboard::new(
                data,
                self.event_bus.clone(),
                self.initial_metric,
            ))),
            Err(error) => {
                self.event_bus.publish(DataLoadFailed {
                    source_name: self.source_label.clone(),
                    error: error.clone(),
                });
                AppState::Failed(error)
            }
        };
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        match &mut self.state {
            AppState::Loading => cv_ui::loading_screen(ctx, &self.source_label),
            AppState::Failed(message) => cv_ui::error_screen(ctx, message),
            AppState::Ready(dashboard) => dashboard.ui(ctx, &self.status),
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting COVID-19 risk dashboard");

    let config = DashboardConfig::from_env().context("Failed to read dashboard config")?;
    info!(?config, "Resolved configuration");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Risk Dashboard",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, runtime, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
