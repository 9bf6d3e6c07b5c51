//! Shared selection and hover state for the linked dashboard views
//!
//! The controller owns the loaded records together with the selection set,
//! the hovered record and the bar chart metric. Every mutation publishes an
//! event on the [`EventBus`] so views can refresh whatever they cache; views
//! read the current state back through the query methods.

use std::sync::Arc;

use ahash::AHashSet;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::events::events::{BarMetricChanged, HoverChanged, SelectionChanged};
use crate::events::EventBus;
use crate::record::{BarMetric, Fips, StateRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("record {0} is not part of the loaded data")]
    InvalidId(Fips),
}

/// How a view should draw a record given the current hover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is hovered
    Normal,
    /// This record is hovered
    Highlighted,
    /// Another record is hovered
    Dimmed,
}

pub struct InteractionController {
    /// Loaded records in load order
    records: IndexMap<Fips, StateRecord>,
    selection: AHashSet<Fips>,
    hovered: Option<Fips>,
    /// Record shown by the risk heatmap; follows hover but survives its end
    heat_target: Option<Fips>,
    bar_metric: BarMetric,
    event_bus: Arc<EventBus>,
}

impl InteractionController {
    /// Build a controller over a loaded record set.
    ///
    /// Starts with an empty selection, no hover and the default bar metric.
    /// Records with a duplicate FIPS code after the first are ignored.
    pub fn new(records: impl IntoIterator<Item = StateRecord>, event_bus: Arc<EventBus>) -> Self {
        let mut by_fips = IndexMap::new();
        for record in records {
            if by_fips.contains_key(&record.fips) {
                warn!(fips = %record.fips, code = %record.code, "Ignoring duplicate record");
                continue;
            }
            by_fips.insert(record.fips, record);
        }

        Self {
            heat_target: by_fips.keys().next().copied(),
            records: by_fips,
            selection: AHashSet::new(),
            hovered: None,
            bar_metric: BarMetric::default(),
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Select every record, or clear the selection if everything is selected
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selection.clear();
        } else {
            self.selection = self.records.keys().copied().collect();
        }
        debug!(selected = self.selection.len(), "Toggled full selection");
        self.publish_selection();
    }

    /// Invert one record's membership in the selection, then hover it
    pub fn toggle_one(&mut self, id: Fips) -> Result<(), InteractionError> {
        self.ensure_known(id)?;

        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        debug!(fips = %id, selected = self.selection.contains(&id), "Toggled selection");
        self.publish_selection();

        self.set_hover(id)
    }

    /// Hover a record: it becomes the heat target and is emphasized in every view
    pub fn set_hover(&mut self, id: Fips) -> Result<(), InteractionError> {
        self.ensure_known(id)?;

        self.hovered = Some(id);
        self.heat_target = Some(id);
        self.event_bus.publish(HoverChanged { hovered: Some(id) });
        Ok(())
    }

    /// End the hover; all records return to normal emphasis
    pub fn clear_hover(&mut self) {
        if self.hovered.take().is_some() {
            self.event_bus.publish(HoverChanged { hovered: None });
        }
    }

    pub fn set_bar_metric(&mut self, metric: BarMetric) {
        self.bar_metric = metric;
        debug!(%metric, "Bar metric changed");
        self.event_bus.publish(BarMetricChanged { metric });
    }

    pub fn records(&self) -> impl Iterator<Item = &StateRecord> + '_ {
        self.records.values()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, id: Fips) -> Option<&StateRecord> {
        self.records.get(&id)
    }

    /// Selected ids in load order
    pub fn selection(&self) -> Vec<Fips> {
        self.records
            .keys()
            .filter(|fips| self.selection.contains(*fips))
            .copied()
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: Fips) -> bool {
        self.selection.contains(&id)
    }

    pub fn is_all_selected(&self) -> bool {
        !self.records.is_empty() && self.selection.len() == self.records.len()
    }

    pub fn hovered(&self) -> Option<Fips> {
        self.hovered
    }

    pub fn heat_target(&self) -> Option<&StateRecord> {
        self.heat_target.and_then(|fips| self.records.get(&fips))
    }

    pub fn bar_metric(&self) -> BarMetric {
        self.bar_metric
    }

    pub fn emphasis(&self, id: Fips) -> Emphasis {
        match self.hovered {
            None => Emphasis::Normal,
            Some(hovered) if hovered == id => Emphasis::Highlighted,
            Some(_) => Emphasis::Dimmed,
        }
    }

    /// Records the bar and line views show: the selection, or everything
    /// when nothing is selected
    pub fn visible_records(&self) -> Vec<&StateRecord> {
        if self.selection.is_empty() {
            return self.records.values().collect();
        }
        self.records
            .values()
            .filter(|record| self.selection.contains(&record.fips))
            .collect()
    }

    /// Visible records sorted descending by the bar metric; ties keep load order
    pub fn bar_ranking(&self) -> Vec<&StateRecord> {
        let metric = self.bar_metric;
        let mut ranking = self.visible_records();
        ranking.sort_by(|a, b| b.actual(metric).cmp(&a.actual(metric)));
        ranking
    }

    /// Min and max current case density over all records
    pub fn density_range(&self) -> Option<(f64, f64)> {
        min_max(self.records.values().map(|r| r.metrics.case_density))
    }

    /// Min and max over the projected series of the visible records
    pub fn projection_range(&self) -> Option<(f64, f64)> {
        min_max(
            self.visible_records()
                .into_iter()
                .flat_map(|r| r.projected_density().iter().copied()),
        )
    }

    fn ensure_known(&self, id: Fips) -> Result<(), InteractionError> {
        if self.records.contains_key(&id) {
            Ok(())
        } else {
            error!(fips = %id, "Interaction referenced a record outside the loaded set");
            Err(InteractionError::InvalidId(id))
        }
    }

    fn publish_selection(&self) {
        self.event_bus.publish(SelectionChanged {
            selected: self.selection(),
            all_selected: self.is_all_selected(),
        });
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
