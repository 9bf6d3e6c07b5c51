use std::sync::Arc;

use chrono::NaiveDate;
use egui::{Align, CentralPanel, Context, Layout, RichText, TopBottomPanel};
use parking_lot::Mutex;

use cv_core::events::{DataLoadFailed, DataLoaded};
use cv_core::{BarMetric, EventBus, InteractionController};

use crate::theme::error_color;

/// What the user asked for in the toolbar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    ToggleAll,
    SetBarMetric(BarMetric),
}

impl ToolbarAction {
    pub fn apply(self, controller: &mut InteractionController) {
        match self {
            ToolbarAction::ToggleAll => controller.toggle_all(),
            ToolbarAction::SetBarMetric(metric) => controller.set_bar_metric(metric),
        }
    }
}

pub fn metric_label(metric: BarMetric) -> &'static str {
    match metric {
        BarMetric::Cases => "Cases",
        BarMetric::Deaths => "Deaths",
        BarMetric::NewCases => "New cases",
    }
}

/// Most recent update date across the loaded records
pub fn latest_update(controller: &InteractionController) -> Option<NaiveDate> {
    controller.records().filter_map(|record| record.last_updated).max()
}

/// Render the toolbar above the views
pub fn toolbar(ctx: &Context, controller: &InteractionController) -> Option<ToolbarAction> {
    let mut action = None;

    TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("COVID-19 Risk Dashboard");
            ui.separator();

            if ui
                .button("Select all / none")
                .on_hover_text("Select every state, or clear the selection when all are selected")
                .clicked()
            {
                action = Some(ToolbarAction::ToggleAll);
            }
            ui.label(format!(
                "{} of {} selected",
                controller.selection_len(),
                controller.record_count()
            ));

            ui.separator();
            ui.label("Bar metric:");
            let current = controller.bar_metric();
            let mut metric = current;
            for option in BarMetric::ALL {
                ui.radio_value(&mut metric, option, metric_label(option));
            }
            if metric != current {
                action = Some(ToolbarAction::SetBarMetric(metric));
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(date) = latest_update(controller) {
                    ui.label(RichText::new(format!("Data as of {date}")).weak());
                }
            });
        });
    });

    action
}

/// Last data lifecycle message seen on the event bus
#[derive(Clone, Default)]
pub struct StatusLine(Arc<Mutex<Option<String>>>);

impl StatusLine {
    pub fn subscribe(bus: &EventBus) -> Self {
        let status = Self::default();

        let line = status.0.clone();
        bus.subscribe_fn::<DataLoaded, _>(move |event| {
            *line.lock() = Some(format!(
                "Loaded {} states from {} ({} dropped)",
                event.record_count, event.source_name, event.dropped_count
            ));
        });

        let line = status.0.clone();
        bus.subscribe_fn::<DataLoadFailed, _>(move |event| {
            *line.lock() = Some(format!("Failed to load from {}: {}", event.source_name, event.error));
        });

        status
    }

    pub fn text(&self) -> Option<String> {
        self.0.lock().clone()
    }
}

pub fn status_bar(ctx: &Context, status: &StatusLine) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| match status.text() {
            Some(text) => ui.label(RichText::new(text).small()),
            None => ui.label(RichText::new("Ready").small()),
        });
    });
}

/// Shown while the startup load is running
pub fn loading_screen(ctx: &Context, source: &str) {
    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.spinner();
            ui.label(format!("Loading data from {source}"));
        });
    });
}

/// Shown instead of the dashboard when the startup load failed
pub fn error_screen(ctx: &Context, message: &str) {
    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading(RichText::new("Unable to load dashboard data").color(error_color()));
            ui.add_space(8.0);
            ui.label(message);
            ui.add_space(8.0);
            ui.label(RichText::new("Check the network connection and API key, then restart.").weak());
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{Actuals, Fips, Metrics, RiskLevels, StateRecord};

    fn record(fips: u32, date: Option<NaiveDate>) -> StateRecord {
        StateRecord::new(
            Fips(fips),
            "XX",
            format!("State {fips}"),
            1_000,
            Metrics {
                case_density: 1.0,
                infection_rate: 1.0,
                test_positivity_ratio: None,
                contact_tracer_capacity_ratio: None,
                icu_headroom_ratio: None,
            },
            RiskLevels::default(),
            Actuals::default(),
        )
        .unwrap()
        .with_last_updated(date)
    }

    fn controller() -> InteractionController {
        InteractionController::new(
            vec![
                record(1, NaiveDate::from_ymd_opt(2021, 3, 1)),
                record(2, NaiveDate::from_ymd_opt(2021, 3, 4)),
                record(4, None),
            ],
            Arc::new(EventBus::new()),
        )
    }

    #[test]
    fn test_toolbar_actions_apply() {
        let mut controller = controller();

        ToolbarAction::ToggleAll.apply(&mut controller);
        assert!(controller.is_all_selected());
        ToolbarAction::ToggleAll.apply(&mut controller);
        assert_eq!(controller.selection_len(), 0);

        ToolbarAction::SetBarMetric(BarMetric::NewCases).apply(&mut controller);
        assert_eq!(controller.bar_metric(), BarMetric::NewCases);
    }

    #[test]
    fn test_latest_update() {
        assert_eq!(latest_update(&controller()), NaiveDate::from_ymd_opt(2021, 3, 4));

        let undated = InteractionController::new(vec![record(4, None)], Arc::new(EventBus::new()));
        assert_eq!(latest_update(&undated), None);
    }

    #[test]
    fn test_status_line_tracks_load_events() {
        let bus = EventBus::new();
        let status = StatusLine::subscribe(&bus);
        assert_eq!(status.text(), None);

        bus.publish(DataLoaded {
            source_name: "snapshot.json".to_string(),
            record_count: 51,
            dropped_count: 2,
        });
        assert_eq!(status.text().as_deref(), Some("Loaded 51 states from snapshot.json (2 dropped)"));

        bus.publish(DataLoadFailed {
            source_name: "api".to_string(),
            error: "timed out".to_string(),
        });
        assert_eq!(status.text().as_deref(), Some("Failed to load from api: timed out"));
    }

    #[test]
    fn test_metric_labels() {
        let labels: Vec<_> = BarMetric::ALL.into_iter().map(metric_label).collect();
        assert_eq!(labels, vec!["Cases", "Deaths", "New cases"]);
    }
}
