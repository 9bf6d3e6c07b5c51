//! The loaded dashboard: controller, views and the chrome around them

use std::sync::Arc;

use egui::Context;
use tracing::info;

use cv_core::events::DataLoaded;
use cv_core::{BarMetric, EventBus, InteractionController};
use cv_data::LoadedData;
use cv_ui::StatusLine;
use cv_views::{
    ActualsBarView, ChoroplethView, ProjectionLineView, RiskHeatView, ViewId, ViewerContext, Viewport,
};

pub struct Dashboard {
    context: ViewerContext,
    viewport: Viewport,
}

impl Dashboard {
    pub fn new(data: LoadedData, event_bus: Arc<EventBus>, initial_metric: BarMetric) -> Self {
        let LoadedData { source_name, records, dropped, boundaries } = data;

        let mut controller = InteractionController::new(records, event_bus.clone());
        if controller.bar_metric() != initial_metric {
            controller.set_bar_metric(initial_metric);
        }

        event_bus.publish(DataLoaded {
            source_name,
            record_count: controller.record_count(),
            dropped_count: dropped.len(),
        });

        let viewport = Viewport::dashboard(
            Box::new(ChoroplethView::new(ViewId::new_v4(), "Case density")),
            Box::new(RiskHeatView::new(ViewId::new_v4(), "Risk levels", &event_bus)),
            Box::new(ActualsBarView::new(ViewId::new_v4(), "Actuals", &event_bus)),
            Box::new(ProjectionLineView::new(ViewId::new_v4(), "14-day projection", &event_bus)),
        );
        info!(views = viewport.view_count(), "Dashboard ready");

        Self {
            context: ViewerContext::new(controller, boundaries),
            viewport,
        }
    }

    pub fn ui(&mut self, ctx: &Context, status: &StatusLine) {
        let action = cv_ui::toolbar(ctx, &self.context.controller.read());
        if let Some(action) = action {
            action.apply(&mut self.context.controller.write());
        }

        cv_ui::status_bar(ctx, status);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport.ui(ui, &self.context);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{Actuals, Fips, Metrics, RiskLevels, StateRecord};
    use cv_data::{DropReason, DroppedRecord, RegionBoundaries};

    fn loaded() -> LoadedData {
        let record = StateRecord::new(
            Fips(6),
            "CA",
            "California",
            39_000_000,
            Metrics {
                case_density: 8.0,
                infection_rate: 0.95,
                test_positivity_ratio: None,
                contact_tracer_capacity_ratio: None,
                icu_headroom_ratio: None,
            },
            RiskLevels::default(),
            Actuals::default(),
        )
        .unwrap();

        LoadedData {
            source_name: "fixture".to_string(),
            records: vec![record],
            dropped: vec![DroppedRecord {
                code: "PR".to_string(),
                reason: DropReason::UnknownStateCode,
            }],
            boundaries: RegionBoundaries::default(),
        }
    }

    #[test]
    fn test_new_dashboard_announces_load() {
        let bus = Arc::new(EventBus::new());
        let status = StatusLine::subscribe(&bus);

        let dashboard = Dashboard::new(loaded(), bus.clone(), BarMetric::Deaths);

        assert_eq!(dashboard.viewport.view_count(), 4);
        assert_eq!(dashboard.context.controller.read().bar_metric(), BarMetric::Deaths);
        assert_eq!(dashboard.context.controller.read().record_count(), 1);
        assert_eq!(status.text().as_deref(), Some("Loaded 1 states from fixture (1 dropped)"));
    }

    #[test]
    fn test_frame_renders_without_boundaries() {
        let bus = Arc::new(EventBus::new());
        let status = StatusLine::subscribe(&bus);
        let mut dashboard = Dashboard::new(loaded(), bus, BarMetric::Cases);

        let ctx = Context::default();
        cv_ui::apply_theme(&ctx, &cv_ui::Theme::default());
        let output = ctx.run(egui::RawInput::default(), |ctx| dashboard.ui(ctx, &status));

        assert!(!output.shapes.is_empty());
        assert!(dashboard.context.controller.read().selection().is_empty());
    }
}
