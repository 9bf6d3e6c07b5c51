use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus
///
/// Handlers run synchronously inside [`EventBus::publish`] while the handler
/// table is locked, so a handler must not publish or subscribe itself.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the interaction controller and the data loader
pub mod events {
    use super::Event;
    use crate::record::{BarMetric, Fips};

    /// The selection set changed; carries the new selection in load order
    #[derive(Debug, Clone, PartialEq)]
    pub struct SelectionChanged {
        pub selected: Vec<Fips>,
        pub all_selected: bool,
    }

    /// The hovered record changed
    #[derive(Debug, Clone, PartialEq)]
    pub struct HoverChanged {
        pub hovered: Option<Fips>,
    }

    /// The bar chart ranking metric changed
    #[derive(Debug, Clone, PartialEq)]
    pub struct BarMetricChanged {
        pub metric: BarMetric,
    }

    /// Records finished loading
    #[derive(Debug, Clone)]
    pub struct DataLoaded {
        pub source_name: String,
        pub record_count: usize,
        pub dropped_count: usize,
    }

    /// Loading failed; the dashboard cannot render
    #[derive(Debug, Clone)]
    pub struct DataLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        SelectionChanged,
        HoverChanged,
        BarMetricChanged,
        DataLoaded,
        DataLoadFailed
    );
}

pub use self::events::{BarMetricChanged, DataLoadFailed, DataLoaded, HoverChanged, SelectionChanged};

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn subscribe_fn<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for an event type
    pub fn handler_count<E: Event>(&self) -> usize {
        let type_id = std::any::TypeId::of::<E>();
        self.handlers.lock().get(&type_id).map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{BarMetricChanged, HoverChanged};
    use super::*;
    use crate::record::{BarMetric, Fips};

    #[test]
    fn test_typed_subscription_only_sees_its_type() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe_fn::<HoverChanged, _>(move |event| sink.lock().push(event.hovered));

        bus.publish(HoverChanged { hovered: Some(Fips(6)) });
        bus.publish(BarMetricChanged { metric: BarMetric::Deaths });
        bus.publish(HoverChanged { hovered: None });

        assert_eq!(*seen.lock(), vec![Some(Fips(6)), None]);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let sink = order.clone();
            bus.subscribe_fn::<BarMetricChanged, _>(move |_| sink.lock().push(tag));
        }

        bus.publish(BarMetricChanged { metric: BarMetric::Cases });
        assert_eq!(*order.lock(), vec!["first", "second"]);
        assert_eq!(bus.handler_count::<BarMetricChanged>(), 2);
        assert_eq!(bus.handler_count::<HoverChanged>(), 0);
    }
}
