//! Linked views for the COVID-19 risk dashboard

mod space_view;
mod viewport;
pub mod plots;

pub use space_view::{DashboardView, ViewId, ViewInteraction};
pub use viewport::Viewport;
pub use plots::{ActualsBarView, ChoroplethView, ProjectionLineView, RiskHeatView};

use std::sync::Arc;
use parking_lot::RwLock;
use cv_core::{EventBus, InteractionController};
use cv_data::RegionBoundaries;

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Shared selection, hover and bar metric state
    pub controller: Arc<RwLock<InteractionController>>,

    /// Bus the controller publishes its changes on
    pub event_bus: Arc<EventBus>,

    /// Region outlines for the map
    pub boundaries: Arc<RegionBoundaries>,
}

impl ViewerContext {
    pub fn new(controller: InteractionController, boundaries: RegionBoundaries) -> Self {
        let event_bus = controller.event_bus().clone();
        Self {
            controller: Arc::new(RwLock::new(controller)),
            event_bus,
            boundaries: Arc::new(boundaries),
        }
    }
}
