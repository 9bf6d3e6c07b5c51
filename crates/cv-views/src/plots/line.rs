//! Projected case density lines for the visible states

use egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Text};

use cv_core::events::SelectionChanged;
use cv_core::{Emphasis, EventBus, Fips, InteractionController, PROJECTION_DAYS};

use super::utils::colors::{DIMMED_LINE_OPACITY, HOVER_COLOR, LINE_COLOR, LINE_OPACITY};
use super::Invalidation;
use crate::{DashboardView, ViewId, ViewInteraction, ViewerContext};

/// Fraction of the visible y range within which the pointer picks a line
const PICK_TOLERANCE: f64 = 0.03;

#[derive(Debug, Clone, PartialEq)]
struct Series {
    fips: Fips,
    name: String,
    values: Vec<f64>,
}

/// Cached line chart data
#[derive(Debug, Clone, PartialEq, Default)]
struct LineData {
    series: Vec<Series>,
}

impl LineData {
    fn from_controller(controller: &InteractionController) -> Self {
        let series = controller
            .visible_records()
            .into_iter()
            .map(|record| Series {
                fips: record.fips,
                name: record.name.clone(),
                values: record.projected_density().to_vec(),
            })
            .collect();
        Self { series }
    }

    /// Series nearest the pointer on the closest day, if within `tolerance`
    fn series_at(&self, point: PlotPoint, tolerance: f64) -> Option<usize> {
        let day = point.x.round();
        if !(0.0..=PROJECTION_DAYS as f64).contains(&day) {
            return None;
        }
        let day = day as usize;

        self.series
            .iter()
            .enumerate()
            .filter_map(|(i, series)| series.values.get(day).map(|v| (i, (v - point.y).abs())))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

fn line_color(emphasis: Emphasis) -> Color32 {
    match emphasis {
        Emphasis::Highlighted => HOVER_COLOR,
        Emphasis::Normal => LINE_COLOR.linear_multiply(LINE_OPACITY),
        Emphasis::Dimmed => LINE_COLOR.linear_multiply(DIMMED_LINE_OPACITY),
    }
}

/// Line plot view
pub struct ProjectionLineView {
    id: ViewId,
    title: String,
    invalidation: Invalidation,
    cached_data: Option<LineData>,
}

impl ProjectionLineView {
    pub fn new(id: ViewId, title: impl Into<String>, bus: &EventBus) -> Self {
        let invalidation = Invalidation::new();
        invalidation.watch::<SelectionChanged>(bus);

        Self {
            id,
            title: title.into(),
            invalidation,
            cached_data: None,
        }
    }
}

impl DashboardView for ProjectionLineView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ProjectionLineView"
    }

    fn ui(&mut self, _ctx: &ViewerContext, controller: &InteractionController, ui: &mut Ui) -> ViewInteraction {
        if self.invalidation.take() || self.cached_data.is_none() {
            let data = LineData::from_controller(controller);
            tracing::debug!(series = data.series.len(), "Rebuilt projection lines");
            self.cached_data = Some(data);
        }
        let Some(data) = &self.cached_data else {
            return ViewInteraction::default();
        };

        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Projected case densities after 14 days").strong());
        });

        let last_day = PROJECTION_DAYS as f64;
        let response = Plot::new(("projection_lines", self.id))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .include_x(0.0)
            // Room for the end labels
            .include_x(last_day + 2.5)
            .x_axis_label("Days from today")
            .y_axis_label("cases/100k pop")
            .show(ui, |plot_ui| {
                // Hovered line last so it draws on top
                let mut ordered: Vec<&Series> = data.series.iter().collect();
                ordered.sort_by_key(|series| controller.emphasis(series.fips) == Emphasis::Highlighted);

                for series in ordered {
                    let color = line_color(controller.emphasis(series.fips));
                    let points: Vec<[f64; 2]> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(day, value)| [day as f64, *value])
                        .collect();
                    plot_ui.line(Line::new(PlotPoints::new(points)).color(color).width(3.0));

                    if let Some(last) = series.values.last() {
                        plot_ui.text(
                            Text::new(PlotPoint::new(last_day + 0.1, *last), series.name.as_str())
                                .anchor(Align2::LEFT_CENTER)
                                .color(color),
                        );
                    }
                }

                let bounds = plot_ui.plot_bounds();
                let tolerance = PICK_TOLERANCE * bounds.height();
                plot_ui
                    .pointer_coordinate()
                    .and_then(|point| data.series_at(point, tolerance))
            });

        let hovered = response.inner.map(|i| data.series[i].fips);
        let clicked = if response.response.clicked() { hovered } else { None };

        if let Some(index) = response.inner {
            let series = &data.series[index];
            let last = series.values.last().copied().unwrap_or_default();
            response
                .response
                .on_hover_text(format!("{}\nDay {}: {:.2}", series.name, PROJECTION_DAYS, last));
        }

        ViewInteraction { hovered, clicked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures;

    #[test]
    fn test_line_data_shows_everything_when_nothing_selected() {
        let mut controller = fixtures::controller();
        let data = LineData::from_controller(&controller);
        assert_eq!(data.series.len(), 3);
        assert!(data.series.iter().all(|s| s.values.len() == PROJECTION_DAYS + 1));

        controller.toggle_one(Fips(49)).unwrap();
        let data = LineData::from_controller(&controller);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].name, "Utah");
        assert_eq!(data.series[0].values[0], 9.5);
    }

    #[test]
    fn test_series_at_picks_nearest_within_tolerance() {
        let data = LineData {
            series: vec![
                Series { fips: Fips(1), name: "A".into(), values: vec![10.0; PROJECTION_DAYS + 1] },
                Series { fips: Fips(2), name: "B".into(), values: vec![12.0; PROJECTION_DAYS + 1] },
            ],
        };

        assert_eq!(data.series_at(PlotPoint::new(3.2, 10.4), 1.0), Some(0));
        assert_eq!(data.series_at(PlotPoint::new(3.2, 11.6), 1.0), Some(1));
        assert_eq!(data.series_at(PlotPoint::new(3.2, 11.0), 0.5), None);
        assert_eq!(data.series_at(PlotPoint::new(15.6, 10.0), 1.0), None);
        assert_eq!(data.series_at(PlotPoint::new(-0.7, 10.0), 1.0), None);
    }

    #[test]
    fn test_line_emphasis_colors() {
        assert_eq!(line_color(Emphasis::Highlighted), HOVER_COLOR);
        assert!(line_color(Emphasis::Dimmed).a() < line_color(Emphasis::Normal).a());
    }

    #[test]
    fn test_cache_ignores_metric_changes() {
        let mut controller = fixtures::controller();
        let view = ProjectionLineView::new(ViewId::new_v4(), "Projection", controller.event_bus());
        assert!(view.invalidation.take());

        controller.set_bar_metric(cv_core::BarMetric::NewCases);
        assert!(!view.invalidation.take());

        controller.toggle_all();
        assert!(view.invalidation.take());
    }
}
