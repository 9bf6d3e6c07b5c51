//! User interface chrome for the COVID-19 risk dashboard
//!
//! Theme, toolbar, status bar and the loading and error screens shown
//! around the dashboard views.

pub mod shell;
pub mod theme;

pub use shell::{error_screen, loading_screen, status_bar, toolbar, StatusLine, ToolbarAction};
pub use theme::{apply_theme, Theme};
