//! Utilities for plot views

pub mod albers;
pub mod colors;

// Re-export commonly used items
pub use albers::{AlbersUsa, Inset};
pub use colors::{bar_metric_color, density_color, hsl, legend_steps, risk_color};
