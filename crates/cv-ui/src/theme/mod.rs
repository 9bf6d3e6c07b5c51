use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Dashboard Dark".to_string(),
        }
    }
}

const BG_COLOR: Color32 = Color32::from_rgb(23, 23, 23);
const PANEL_BG: Color32 = Color32::from_rgb(31, 31, 31);
const WIDGET_BG: Color32 = Color32::from_rgb(40, 40, 40);
const HOVER_BG: Color32 = Color32::from_rgb(50, 50, 50);
const ACTIVE_BG: Color32 = Color32::from_rgb(60, 60, 60);
const TEXT_COLOR: Color32 = Color32::from_rgb(220, 220, 220);

/// Apply the application's dark theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.window_fill = PANEL_BG;
    visuals.panel_fill = PANEL_BG;
    visuals.extreme_bg_color = BG_COLOR;
    visuals.faint_bg_color = WIDGET_BG;

    visuals.widgets.noninteractive.bg_fill = WIDGET_BG;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.inactive.bg_fill = WIDGET_BG;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.hovered.bg_fill = HOVER_BG;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_COLOR);
    visuals.widgets.active.bg_fill = ACTIVE_BG;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_COLOR);

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(4.0);
    }

    // Radio buttons and toggles pick up the accent
    visuals.selection.bg_fill = accent_color().linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    style.visuals = visuals;
    ctx.set_style(style);
    tracing::debug!(theme = %theme.name, "Applied theme");
}

/// Orange accent, matching the dashboard's data colors
pub fn accent_color() -> Color32 {
    Color32::from_rgb(255, 165, 0)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_theme_is_dark() {
        let ctx = Context::default();
        apply_theme(&ctx, &Theme::default());

        let style = ctx.style();
        assert!(style.visuals.dark_mode);
        assert_eq!(style.visuals.panel_fill, PANEL_BG);
        assert_eq!(style.visuals.selection.stroke.color, accent_color());
    }
}
