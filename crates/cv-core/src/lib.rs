//! Core functionality for the COVID-19 risk dashboard
//!
//! This crate provides the record model, the 14-day projection engine and
//! the shared interaction state the dashboard views synchronize through.

pub mod events;
pub mod interaction;
pub mod projection;
pub mod record;

// Re-export commonly used types
pub use events::{handler_from_fn, Event, EventBus, EventHandler};
pub use interaction::{Emphasis, InteractionController, InteractionError};
pub use projection::{project, ProjectedDensity, ProjectionError, PROJECTION_DAYS};
pub use record::{Actuals, BarMetric, Fips, Metrics, RiskLevel, RiskLevels, StateRecord};
