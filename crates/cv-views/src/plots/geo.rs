//! Choropleth map of current case density

use egui::{Align2, Color32, FontId, Mesh, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use geo::{BoundingRect, Contains, Coord, MapCoords, MultiPolygon, Point, TriangulateEarcut};

use cv_core::{Emphasis, Fips, InteractionController};
use cv_data::RegionBoundaries;

use super::utils::colors::{
    density_color, legend_steps, HOVER_COLOR, NO_DATA_COLOR, SELECTED_STROKE_COLOR,
};
use super::utils::{AlbersUsa, Inset};
use crate::{DashboardView, ViewId, ViewInteraction, ViewerContext};

const LEGEND_WIDTH: f32 = 90.0;
const LEGEND_STEPS: usize = 50;
const MAP_MARGIN: f32 = 8.0;

/// A boundary region in projected coordinates
struct ProjectedRegion {
    name: String,
    fips: Option<Fips>,
    outline: MultiPolygon<f64>,
    triangles: Vec<[Coord<f64>; 3]>,
}

/// Maps projected coordinates into a screen rectangle, preserving aspect ratio
#[derive(Debug, Clone, Copy)]
struct MapTransform {
    min: Coord<f64>,
    max_y: f64,
    scale: f64,
    origin: Pos2,
}

impl MapTransform {
    fn fit(bounds: geo::Rect<f64>, rect: Rect, margin: f32) -> Option<Self> {
        let available = rect.shrink(margin);
        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0.0 || height <= 0.0 || available.width() <= 0.0 || available.height() <= 0.0 {
            return None;
        }

        let scale = (available.width() as f64 / width).min(available.height() as f64 / height);
        let slack = Vec2::new(
            (available.width() as f64 - width * scale) as f32,
            (available.height() as f64 - height * scale) as f32,
        );

        Some(Self {
            min: bounds.min(),
            max_y: bounds.max().y,
            scale,
            origin: available.min + slack / 2.0,
        })
    }

    fn to_screen(&self, c: Coord<f64>) -> Pos2 {
        Pos2::new(
            self.origin.x + ((c.x - self.min.x) * self.scale) as f32,
            self.origin.y + ((self.max_y - c.y) * self.scale) as f32,
        )
    }

    fn to_map(&self, p: Pos2) -> Coord<f64> {
        Coord {
            x: self.min.x + (p.x - self.origin.x) as f64 / self.scale,
            y: self.max_y - (p.y - self.origin.y) as f64 / self.scale,
        }
    }
}

/// Choropleth view
pub struct ChoroplethView {
    id: ViewId,
    title: String,
    projection: AlbersUsa,

    // Built on the first frame; boundaries and records never change after load
    regions: Option<Vec<ProjectedRegion>>,
    bounds: Option<geo::Rect<f64>>,
}

impl ChoroplethView {
    pub fn new(id: ViewId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            projection: AlbersUsa::default(),
            regions: None,
            bounds: None,
        }
    }

    fn build(&mut self, boundaries: &RegionBoundaries, controller: &InteractionController) {
        let mut regions = Vec::with_capacity(boundaries.len());

        for shape in boundaries.iter() {
            let inset = Inset::for_region(&shape.name);
            if inset == Inset::Lower48 && !covers_lower48(&shape.outline) {
                tracing::debug!(region = %shape.name, "Region lies outside the projection, skipping");
                continue;
            }

            let projection = self.projection;
            let outline = shape.outline.map_coords(move |c| {
                let [x, y] = projection.project(inset, c.x, c.y);
                Coord { x, y }
            });
            let triangles = outline
                .iter()
                .flat_map(|polygon| polygon.earcut_triangles())
                .map(|triangle| triangle.to_array())
                .collect();

            let fips = controller
                .records()
                .find(|record| record.name == shape.name)
                .map(|record| record.fips);
            if fips.is_none() {
                tracing::debug!(region = %shape.name, "No record for region");
            }

            regions.push(ProjectedRegion {
                name: shape.name.clone(),
                fips,
                outline,
                triangles,
            });
        }

        self.bounds = regions
            .iter()
            .filter_map(|region| region.outline.bounding_rect())
            .reduce(|a, b| {
                geo::Rect::new(
                    Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            });

        tracing::info!(regions = regions.len(), "Projected map regions");
        self.regions = Some(regions);
    }

    fn fill_color(controller: &InteractionController, fips: Option<Fips>, range: (f64, f64)) -> Color32 {
        match fips.and_then(|f| controller.record(f)) {
            Some(record) if controller.emphasis(record.fips) == Emphasis::Highlighted => HOVER_COLOR,
            Some(record) => density_color(record.metrics.case_density, range.0, range.1),
            None => NO_DATA_COLOR,
        }
    }

    fn draw_legend(&self, ui: &Ui, rect: Rect, range: (f64, f64)) {
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let font = FontId::proportional(11.0);

        let bar_top = rect.top() + 24.0;
        let bar_height = (rect.height() - 48.0).max(LEGEND_STEPS as f32);
        let step_height = bar_height / LEGEND_STEPS as f32;
        let bar_left = rect.left() + 8.0;

        painter.text(
            Pos2::new(rect.left() + 4.0, rect.top() + 4.0),
            Align2::LEFT_TOP,
            "cases/100k pop",
            font.clone(),
            text_color,
        );

        for (i, value) in legend_steps(range.0, range.1, LEGEND_STEPS).into_iter().enumerate() {
            let top = bar_top + i as f32 * step_height;
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(bar_left, top), Vec2::new(16.0, step_height + 0.5)),
                Rounding::ZERO,
                density_color(value, range.0, range.1),
            );
        }

        painter.text(
            Pos2::new(bar_left + 22.0, bar_top),
            Align2::LEFT_TOP,
            format!("{:.1}", range.1),
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(bar_left + 22.0, bar_top + bar_height),
            Align2::LEFT_BOTTOM,
            format!("{:.1}", range.0),
            font,
            text_color,
        );
    }
}

/// Whether a region's bounding box centre falls inside the lower 48
fn covers_lower48(outline: &MultiPolygon<f64>) -> bool {
    outline.bounding_rect().is_some_and(|rect| {
        let center = rect.center();
        (-125.0..=-66.0).contains(&center.x) && (24.0..=50.0).contains(&center.y)
    })
}

impl DashboardView for ChoroplethView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ChoroplethView"
    }

    fn ui(&mut self, ctx: &ViewerContext, controller: &InteractionController, ui: &mut Ui) -> ViewInteraction {
        if self.regions.is_none() {
            self.build(&ctx.boundaries, controller);
        }
        let (Some(regions), Some(bounds)) = (self.regions.as_ref(), self.bounds) else {
            ui.centered_and_justified(|ui| {
                ui.label("No region boundaries loaded");
            });
            return ViewInteraction::default();
        };

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let rect = response.rect;
        let map_rect = Rect::from_min_max(rect.min, Pos2::new(rect.right() - LEGEND_WIDTH, rect.bottom()));
        let legend_rect = Rect::from_min_max(Pos2::new(map_rect.right(), rect.top()), rect.max);

        let Some(transform) = MapTransform::fit(bounds, map_rect, MAP_MARGIN) else {
            return ViewInteraction::default();
        };
        let range = controller.density_range().unwrap_or((0.0, 0.0));

        let hovered_region = response
            .hover_pos()
            .filter(|pos| map_rect.contains(*pos))
            .map(|pos| Point::from(transform.to_map(pos)))
            .and_then(|point| regions.iter().find(|region| region.outline.contains(&point)));

        for region in regions {
            let fill = Self::fill_color(controller, region.fips, range);
            let mut mesh = Mesh::default();
            for triangle in &region.triangles {
                let base = mesh.vertices.len() as u32;
                for corner in triangle {
                    mesh.colored_vertex(transform.to_screen(*corner), fill);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
            painter.add(Shape::mesh(mesh));
        }

        // Selected outlines go last so neighbours don't paint over them
        let (selected, unselected): (Vec<_>, Vec<_>) = regions
            .iter()
            .partition(|region| region.fips.is_some_and(|f| controller.is_selected(f)));
        let outlines = unselected
            .into_iter()
            .map(|region| (region, Stroke::new(0.5, Color32::WHITE)))
            .chain(selected.into_iter().map(|region| (region, Stroke::new(2.0, SELECTED_STROKE_COLOR))));

        for (region, stroke) in outlines {
            for polygon in region.outline.iter() {
                let points = polygon
                    .exterior()
                    .coords()
                    .map(|c| transform.to_screen(*c))
                    .collect();
                painter.add(Shape::closed_line(points, stroke));
            }
        }

        self.draw_legend(ui, legend_rect, range);

        let hovered = hovered_region.and_then(|region| region.fips);
        let clicked = if response.clicked() { hovered } else { None };

        if let Some(region) = hovered_region {
            let text = match region.fips.and_then(|f| controller.record(f)) {
                Some(record) => format!("{}\nCase Density: {:.2}", record.name, record.metrics.case_density),
                None => format!("{}\nNo data", region.name),
            };
            response.on_hover_text(text);
        }

        ViewInteraction { hovered, clicked }
    }
}
