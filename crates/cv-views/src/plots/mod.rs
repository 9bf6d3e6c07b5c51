//! Plot view implementations

pub mod bar;
pub mod geo;
pub mod heatmap;
pub mod line;

// Utilities
pub mod utils;

// Re-exports
pub use bar::ActualsBarView;
pub use geo::ChoroplethView;
pub use heatmap::RiskHeatView;
pub use line::ProjectionLineView;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cv_core::{Event, EventBus};

/// Dirty flag raised by bus events and consumed when a view rebuilds its cache
#[derive(Clone)]
pub(crate) struct Invalidation(Arc<AtomicBool>);

impl Invalidation {
    /// Starts dirty so the first frame builds the cache
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn watch<E: Event>(&self, bus: &EventBus) -> &Self {
        let flag = self.0.clone();
        bus.subscribe_fn::<E, _>(move |_| flag.store(true, Ordering::Release));
        self
    }

    /// Returns whether the flag was raised, lowering it
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use cv_core::{
        Actuals, EventBus, Fips, InteractionController, Metrics, RiskLevel, RiskLevels, StateRecord,
    };

    pub fn record(fips: u32, name: &str, cases: u64, density: f64, rate: f64) -> StateRecord {
        StateRecord::new(
            Fips(fips),
            &name[..2].to_uppercase(),
            name,
            2_000_000,
            Metrics {
                case_density: density,
                infection_rate: rate,
                test_positivity_ratio: None,
                contact_tracer_capacity_ratio: None,
                icu_headroom_ratio: None,
            },
            RiskLevels {
                overall: RiskLevel::High,
                case_density: RiskLevel::Critical,
                ..RiskLevels::default()
            },
            Actuals { cases, deaths: cases / 50, new_cases: cases / 100 },
        )
        .unwrap()
    }

    pub fn controller() -> InteractionController {
        InteractionController::new(
            vec![
                record(8, "Colorado", 1_700_000, 14.0, 1.05),
                record(49, "Utah", 1_090_000, 9.5, 0.9),
                record(56, "Wyoming", 180_000, 22.0, 1.2),
            ],
            Arc::new(EventBus::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::events::{BarMetricChanged, HoverChanged};
    use cv_core::BarMetric;

    #[test]
    fn test_invalidation_follows_watched_events() {
        let bus = EventBus::new();
        let flag = Invalidation::new();
        flag.watch::<BarMetricChanged>(&bus);

        assert!(flag.take());
        assert!(!flag.take());

        bus.publish(HoverChanged { hovered: None });
        assert!(!flag.take());

        bus.publish(BarMetricChanged { metric: BarMetric::Deaths });
        assert!(flag.take());
        assert!(!flag.take());
    }
}
