//! Risk level heatmap for the heat target

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use cv_core::events::HoverChanged;
use cv_core::{EventBus, InteractionController, RiskLevel};

use super::utils::colors::risk_color;
use super::Invalidation;
use crate::{DashboardView, ViewId, ViewInteraction, ViewerContext};

const ROW_HEIGHT: f32 = 28.0;
const TITLE_HEIGHT: f32 = 28.0;

/// Rows shown for the current heat target
#[derive(Debug, Clone, PartialEq)]
struct HeatData {
    title: String,
    rows: Vec<(&'static str, RiskLevel)>,
}

impl HeatData {
    fn from_controller(controller: &InteractionController) -> Option<Self> {
        controller.heat_target().map(|record| Self {
            title: format!("{}'s risk level", record.name),
            rows: record.risk_levels.rows().to_vec(),
        })
    }
}

/// Dark text on light cells, light text on dark ones
fn label_color(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::from_gray(30)
    } else {
        Color32::WHITE
    }
}

/// Heatmap view
pub struct RiskHeatView {
    id: ViewId,
    title: String,
    invalidation: Invalidation,
    cached_data: Option<HeatData>,
}

impl RiskHeatView {
    pub fn new(id: ViewId, title: impl Into<String>, bus: &EventBus) -> Self {
        let invalidation = Invalidation::new();
        invalidation.watch::<HoverChanged>(bus);

        Self {
            id,
            title: title.into(),
            invalidation,
            cached_data: None,
        }
    }

    fn draw(&self, data: &HeatData, ui: &mut Ui) {
        let size = Vec2::new(ui.available_width(), TITLE_HEIGHT + ROW_HEIGHT * data.rows.len() as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        let text_color = ui.visuals().text_color();

        painter.text(
            Pos2::new(rect.center().x, rect.top() + TITLE_HEIGHT / 2.0),
            Align2::CENTER_CENTER,
            &data.title,
            FontId::proportional(15.0),
            text_color,
        );

        let label_width = (rect.width() * 0.45).min(220.0);
        let mut hovered_row = None;

        for (i, (label, level)) in data.rows.iter().enumerate() {
            let top = rect.top() + TITLE_HEIGHT + i as f32 * ROW_HEIGHT;
            let cell = Rect::from_min_max(
                Pos2::new(rect.left() + label_width, top + 1.0),
                Pos2::new(rect.right() - 4.0, top + ROW_HEIGHT - 1.0),
            );
            let fill = risk_color(*level);

            painter.text(
                Pos2::new(cell.left() - 8.0, cell.center().y),
                Align2::RIGHT_CENTER,
                *label,
                FontId::proportional(12.0),
                text_color,
            );
            painter.rect(cell, Rounding::same(2.0), fill, Stroke::new(1.0, ui.visuals().extreme_bg_color));
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                level.label(),
                FontId::proportional(12.0),
                label_color(fill),
            );

            if response.hover_pos().is_some_and(|pos| cell.contains(pos)) {
                hovered_row = Some((*label, *level));
            }
        }

        if let Some((label, level)) = hovered_row {
            response.on_hover_text(format!("{label}: {} (level {})", level.label(), level.code()));
        }
    }
}

impl DashboardView for RiskHeatView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "RiskHeatView"
    }

    fn ui(&mut self, _ctx: &ViewerContext, controller: &InteractionController, ui: &mut Ui) -> ViewInteraction {
        if self.invalidation.take() {
            self.cached_data = HeatData::from_controller(controller);
        }

        match &self.cached_data {
            Some(data) => self.draw(data, ui),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("No state to show");
                });
            }
        }

        // The heatmap follows the hover but never drives it
        ViewInteraction::default()
    }
}
