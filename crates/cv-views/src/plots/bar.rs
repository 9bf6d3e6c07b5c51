//! Bar chart of actual counts for the visible states

use egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

use cv_core::events::{BarMetricChanged, SelectionChanged};
use cv_core::{BarMetric, Emphasis, EventBus, Fips, InteractionController};

use super::utils::colors::{bar_metric_color, HOVER_COLOR};
use super::Invalidation;
use crate::{DashboardView, ViewId, ViewInteraction, ViewerContext};

const BAR_WIDTH: f64 = 0.7;

/// Cached bar chart data
#[derive(Debug, Clone, PartialEq)]
struct BarData {
    metric: BarMetric,
    /// `(fips, code, value)` in descending order of value
    bars: Vec<(Fips, String, u64)>,
}

impl BarData {
    fn from_controller(controller: &InteractionController) -> Self {
        let metric = controller.bar_metric();
        let bars = controller
            .bar_ranking()
            .into_iter()
            .map(|record| (record.fips, record.code.clone(), record.actual(metric)))
            .collect();
        Self { metric, bars }
    }

    /// Index of the bar whose body contains the plot point
    fn bar_at(&self, point: PlotPoint) -> Option<usize> {
        let index = point.x.round();
        if index < 0.0 || (point.x - index).abs() > BAR_WIDTH / 2.0 {
            return None;
        }
        let index = index as usize;
        let (_, _, value) = self.bars.get(index)?;
        (point.y >= 0.0 && point.y <= *value as f64).then_some(index)
    }
}

/// Bar chart view
pub struct ActualsBarView {
    id: ViewId,
    title: String,
    invalidation: Invalidation,
    cached_data: Option<BarData>,
}

impl ActualsBarView {
    pub fn new(id: ViewId, title: impl Into<String>, bus: &EventBus) -> Self {
        let invalidation = Invalidation::new();
        invalidation
            .watch::<SelectionChanged>(bus)
            .watch::<BarMetricChanged>(bus);

        Self {
            id,
            title: title.into(),
            invalidation,
            cached_data: None,
        }
    }
}

impl DashboardView for ActualsBarView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ActualsBarView"
    }

    fn ui(&mut self, _ctx: &ViewerContext, controller: &InteractionController, ui: &mut Ui) -> ViewInteraction {
        if self.invalidation.take() || self.cached_data.is_none() {
            let data = BarData::from_controller(controller);
            tracing::debug!(metric = %data.metric, bars = data.bars.len(), "Rebuilt bar chart");
            self.cached_data = Some(data);
        }
        let Some(data) = &self.cached_data else {
            return ViewInteraction::default();
        };

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(format!("Actual number of {}", data.metric)).strong());
        });

        let base_color = bar_metric_color(data.metric);
        let bars: Vec<Bar> = data
            .bars
            .iter()
            .enumerate()
            .map(|(i, (fips, code, value))| {
                let fill = match controller.emphasis(*fips) {
                    Emphasis::Highlighted => HOVER_COLOR,
                    _ => base_color,
                };
                Bar::new(i as f64, *value as f64)
                    .width(BAR_WIDTH)
                    .name(code)
                    .fill(fill)
            })
            .collect();

        let text_color = ui.visuals().text_color();
        let response = Plot::new(("actuals_bar", self.id))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .show_grid(false)
            .include_y(0.0)
            .y_axis_label(data.metric.key())
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(base_color));
                for (i, (_, code, _)) in data.bars.iter().enumerate() {
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, 0.0), code.as_str())
                            .anchor(Align2::CENTER_TOP)
                            .color(text_color),
                    );
                }
                plot_ui.pointer_coordinate().and_then(|point| data.bar_at(point))
            });

        let hovered = response.inner.map(|i| data.bars[i].0);
        let clicked = if response.response.clicked() { hovered } else { None };

        if let Some(index) = response.inner {
            let (_, code, value) = &data.bars[index];
            response.response.on_hover_text(format!("{code}: {value}"));
        }

        ViewInteraction { hovered, clicked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures;

    #[test]
    fn test_bar_data_ranks_descending() {
        let controller = fixtures::controller();
        let data = BarData::from_controller(&controller);

        assert_eq!(data.metric, BarMetric::Cases);
        let codes: Vec<&str> = data.bars.iter().map(|(_, code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["CO", "UT", "WY"]);
        assert!(data.bars.windows(2).all(|w| w[0].2 >= w[1].2));
    }

    #[test]
    fn test_bar_data_follows_selection_and_metric() {
        let mut controller = fixtures::controller();
        let view = ActualsBarView::new(ViewId::new_v4(), "Actuals", controller.event_bus());
        assert!(view.invalidation.take());

        controller.toggle_one(Fips(56)).unwrap();
        assert!(view.invalidation.take());
        let data = BarData::from_controller(&controller);
        assert_eq!(data.bars.len(), 1);
        assert_eq!(data.bars[0].0, Fips(56));

        controller.set_bar_metric(BarMetric::Deaths);
        assert!(view.invalidation.take());
        assert_eq!(BarData::from_controller(&controller).metric, BarMetric::Deaths);

        // Hover alone leaves the cache intact
        controller.set_hover(Fips(8)).unwrap();
        assert!(!view.invalidation.take());
    }

    #[test]
    fn test_bar_at() {
        let data = BarData {
            metric: BarMetric::Cases,
            bars: vec![(Fips(8), "CO".into(), 100), (Fips(49), "UT".into(), 40)],
        };

        assert_eq!(data.bar_at(PlotPoint::new(0.1, 50.0)), Some(0));
        assert_eq!(data.bar_at(PlotPoint::new(1.2, 39.0)), Some(1));
        // Above the bar
        assert_eq!(data.bar_at(PlotPoint::new(1.0, 41.0)), None);
        // Between bars
        assert_eq!(data.bar_at(PlotPoint::new(0.5, 10.0)), None);
        // Past the last bar or left of the first
        assert_eq!(data.bar_at(PlotPoint::new(2.0, 1.0)), None);
        assert_eq!(data.bar_at(PlotPoint::new(-0.9, 1.0)), None);
    }
}
