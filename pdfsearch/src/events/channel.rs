//! Delivery channel trait and implementations.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

use crate::core::{SearchEvent, ValidatedResult};

/// A subscriber-facing sink for one search session.
///
/// Events for a single session are delivered in emission order. Delivery is
/// best effort: a channel whose subscriber went away silently drops events.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: SearchEvent);

    /// Emits an event without awaiting.
    ///
    /// Used on the precondition path, where the error must be reported
    /// before any asynchronous work starts. Must never panic.
    fn try_emit(&self, event: SearchEvent);

    /// Whether the subscriber is still listening.
    fn is_connected(&self) -> bool {
        true
    }
}

/// A channel that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpChannel;

#[async_trait]
impl DeliveryChannel for NoOpChannel {
    async fn emit(&self, _event: SearchEvent) {}

    fn try_emit(&self, _event: SearchEvent) {}
}

/// A channel that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingChannel {
    level: Level,
}

impl Default for LoggingChannel {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingChannel {
    /// Creates a new logging channel with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging channel.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &SearchEvent) {
        let payload = event.payload();
        if self.level == Level::DEBUG {
            debug!(event = event.name(), payload = %payload, "Event: {}", event.name());
        } else {
            info!(event = event.name(), payload = %payload, "Event: {}", event.name());
        }
    }
}

#[async_trait]
impl DeliveryChannel for LoggingChannel {
    async fn emit(&self, event: SearchEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: SearchEvent) {
        self.log_event(&event);
    }
}

/// A channel that records every event, for tests and batch callers.
#[derive(Debug, Default)]
pub struct CollectingChannel {
    events: RwLock<Vec<SearchEvent>>,
}

impl CollectingChannel {
    /// Creates a new collecting channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.read().clone()
    }

    /// Returns the streamed results in emission order.
    #[must_use]
    pub fn results(&self) -> Vec<ValidatedResult> {
        self.events
            .read()
            .iter()
            .filter_map(SearchEvent::as_result)
            .cloned()
            .collect()
    }

    /// Returns the names of all collected events.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.read().iter().map(SearchEvent::name).collect()
    }

    /// Returns the last event, if any.
    #[must_use]
    pub fn last(&self) -> Option<SearchEvent> {
        self.events.read().last().cloned()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl DeliveryChannel for CollectingChannel {
    async fn emit(&self, event: SearchEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: SearchEvent) {
        self.events.write().push(event);
    }
}
