//! Dashboard view abstraction - base trait for all dockable views

use egui::Ui;
use uuid::Uuid;

use cv_core::{Fips, InteractionController};

use crate::ViewerContext;

/// Unique identifier for a view
pub type ViewId = Uuid;

/// Pointer activity a view observed during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewInteraction {
    /// Record under the pointer
    pub hovered: Option<Fips>,
    /// Record clicked this frame
    pub clicked: Option<Fips>,
}

impl ViewInteraction {
    /// Combine with another view's report; the first report wins
    pub fn merge(self, other: ViewInteraction) -> Self {
        Self {
            hovered: self.hovered.or(other.hovered),
            clicked: self.clicked.or(other.clicked),
        }
    }
}

/// Base trait for the dashboard's views.
///
/// Views draw from a read snapshot of the controller and report pointer
/// activity instead of mutating shared state themselves; the viewport applies
/// the reports once every view has been drawn.
pub trait DashboardView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> ViewId;

    /// Get the title shown on the view's tab
    fn title(&self) -> &str;

    /// Get the view type
    fn view_type(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, controller: &InteractionController, ui: &mut Ui) -> ViewInteraction;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_first_report() {
        let map = ViewInteraction { hovered: Some(Fips(6)), clicked: None };
        let bar = ViewInteraction { hovered: Some(Fips(48)), clicked: Some(Fips(48)) };

        let merged = map.merge(bar);
        assert_eq!(merged.hovered, Some(Fips(6)));
        assert_eq!(merged.clicked, Some(Fips(48)));

        assert_eq!(ViewInteraction::default().merge(ViewInteraction::default()), ViewInteraction::default());
    }
}
