//! Viewport - manages the dockable dashboard views

use std::collections::HashMap;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};

use cv_core::InteractionController;

use crate::{DashboardView, ViewId, ViewInteraction, ViewerContext};

/// The main viewport that lays out the four linked views
pub struct Viewport {
    dock_state: DockState<ViewId>,
    views: HashMap<ViewId, Box<dyn DashboardView>>,
}

impl Viewport {
    /// Map top left, heatmap top right, bars bottom left, lines bottom right
    pub fn dashboard(
        map: Box<dyn DashboardView>,
        heat: Box<dyn DashboardView>,
        bar: Box<dyn DashboardView>,
        line: Box<dyn DashboardView>,
    ) -> Self {
        let mut dock_state = DockState::new(vec![map.id()]);
        let surface = dock_state.main_surface_mut();
        let [top, bottom] = surface.split_below(NodeIndex::root(), 0.55, vec![bar.id()]);
        surface.split_right(top, 0.68, vec![heat.id()]);
        surface.split_right(bottom, 0.5, vec![line.id()]);

        let views = [map, heat, bar, line]
            .into_iter()
            .map(|view| (view.id(), view))
            .collect();

        Self { dock_state, views }
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Draw every view, then apply what the pointer did to the controller
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        let mut interaction = ViewInteraction::default();

        {
            let controller = viewer_context.controller.read();
            DockArea::new(&mut self.dock_state)
                .show_close_buttons(false)
                .draggable_tabs(true)
                .show_inside(ui, &mut ViewportTabViewer {
                    views: &mut self.views,
                    viewer_context,
                    controller: &controller,
                    interaction: &mut interaction,
                });
        }

        apply_interaction(&mut viewer_context.controller.write(), interaction);
    }
}

/// Apply one frame's pointer activity.
///
/// A click toggles the record (which also hovers it). Otherwise the hover
/// follows the pointer, and leaving every element ends it. Nothing is
/// published when the hover is unchanged.
pub(crate) fn apply_interaction(controller: &mut InteractionController, interaction: ViewInteraction) {
    let result = match (interaction.clicked, interaction.hovered) {
        (Some(fips), _) => controller.toggle_one(fips),
        (None, Some(fips)) if controller.hovered() != Some(fips) => controller.set_hover(fips),
        (None, None) => {
            controller.clear_hover();
            Ok(())
        }
        _ => Ok(()),
    };

    // Views only report ids of records they drew from the controller
    debug_assert!(result.is_ok(), "view reported an unknown record: {result:?}");
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    views: &'a mut HashMap<ViewId, Box<dyn DashboardView>>,
    viewer_context: &'a ViewerContext,
    controller: &'a InteractionController,
    interaction: &'a mut ViewInteraction,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = ViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        if let Some(view) = self.views.get(tab) {
            view.title().into()
        } else {
            "Unknown".into()
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.views.get_mut(tab) {
            let reported = view.ui(self.viewer_context, self.controller, ui);
            *self.interaction = self.interaction.merge(reported);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::fixtures;
    use cv_core::events::{HoverChanged, SelectionChanged};
    use cv_core::Fips;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting<E: cv_core::Event>(controller: &InteractionController) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        controller
            .event_bus()
            .subscribe_fn::<E, _>(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        count
    }

    #[test]
    fn test_click_toggles_and_hovers() {
        let mut controller = fixtures::controller();
        let selections = counting::<SelectionChanged>(&controller);

        apply_interaction(&mut controller, ViewInteraction { hovered: Some(Fips(8)), clicked: Some(Fips(8)) });
        assert!(controller.is_selected(Fips(8)));
        assert_eq!(controller.hovered(), Some(Fips(8)));
        assert_eq!(selections.load(Ordering::SeqCst), 1);

        apply_interaction(&mut controller, ViewInteraction { hovered: Some(Fips(8)), clicked: Some(Fips(8)) });
        assert!(!controller.is_selected(Fips(8)));
    }

    #[test]
    fn test_steady_hover_publishes_once() {
        let mut controller = fixtures::controller();
        let hovers = counting::<HoverChanged>(&controller);
        let over_utah = ViewInteraction { hovered: Some(Fips(49)), clicked: None };

        apply_interaction(&mut controller, over_utah);
        apply_interaction(&mut controller, over_utah);
        apply_interaction(&mut controller, over_utah);
        assert_eq!(hovers.load(Ordering::SeqCst), 1);

        apply_interaction(&mut controller, ViewInteraction::default());
        apply_interaction(&mut controller, ViewInteraction::default());
        assert_eq!(controller.hovered(), None);
        assert_eq!(hovers.load(Ordering::SeqCst), 2);
        assert_eq!(controller.heat_target().map(|r| r.fips), Some(Fips(49)));
    }
}
