//! Color utilities for plots

use egui::Color32;

use cv_core::{BarMetric, RiskLevel};

/// Fill for the element under the pointer, in every view
pub const HOVER_COLOR: Color32 = Color32::from_rgb(0x33, 0xce, 0xff);

/// Outline of selected regions on the map
pub const SELECTED_STROKE_COLOR: Color32 = Color32::from_rgb(50, 205, 50);

/// Regions with no matching record
pub const NO_DATA_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

/// Base color of the projection lines
pub const LINE_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

pub const LINE_OPACITY: f32 = 0.8;
pub const DIMMED_LINE_OPACITY: f32 = 0.2;

const DENSITY_HUE: f32 = 40.0;
const LIGHTNESS_AT_MIN: f32 = 93.0;
const LIGHTNESS_AT_MAX: f32 = 25.0;

/// HSL to RGB, with `h` in degrees and `s`, `l` in `0..=1`
pub fn hsl(h: f32, s: f32, l: f32) -> Color32 {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let h = h.rem_euclid(360.0) / 60.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

/// Lightness (percent) for a case density, linear from 93 at `min` to 25 at `max`
pub fn density_lightness(value: f64, min: f64, max: f64) -> f32 {
    let t = if max > min {
        ((value - min) / (max - min)) as f32
    } else {
        0.5
    };
    LIGHTNESS_AT_MIN + (LIGHTNESS_AT_MAX - LIGHTNESS_AT_MIN) * t
}

/// Choropleth fill for a case density within the dataset's range
pub fn density_color(value: f64, min: f64, max: f64) -> Color32 {
    hsl(DENSITY_HUE, 1.0, density_lightness(value, min, max) / 100.0)
}

/// Evenly spaced densities from `max` down to `min`, for the legend
pub fn legend_steps(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![max],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            (0..steps).map(|i| max - step * i as f64).collect()
        }
    }
}

pub fn risk_color(level: RiskLevel) -> Color32 {
    match level {
        RiskLevel::Unknown => Color32::from_rgb(128, 128, 128),
        RiskLevel::Low => Color32::from_rgb(0xfe, 0xf0, 0xd9),
        RiskLevel::Medium => Color32::from_rgb(0xfd, 0xcc, 0x8a),
        RiskLevel::High => Color32::from_rgb(0xfc, 0x8d, 0x59),
        RiskLevel::Critical => Color32::from_rgb(0xe3, 0x4a, 0x33),
        RiskLevel::Extreme => Color32::from_rgb(0xb3, 0x00, 0x00),
    }
}

pub fn bar_metric_color(metric: BarMetric) -> Color32 {
    match metric {
        BarMetric::Cases => Color32::from_rgb(255, 165, 0),
        BarMetric::Deaths => Color32::from_rgb(255, 0, 0),
        BarMetric::NewCases => Color32::from_rgb(255, 140, 0),
    }
}
