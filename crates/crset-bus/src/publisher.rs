//! # Progress Publisher
//!
//! Defines the publishing side of the progress bus.

use crate::filter::StepFilter;
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use crset_types::ProgressEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Trait the publication pipeline uses to emit progress.
///
/// Implementations must never fail or block: a missing or slow listener is
/// not the pipeline's problem.
#[async_trait]
pub trait ProgressPublisher: Send + Sync {
    /// Publish an event.
    ///
    /// # Returns
    ///
    /// The number of listeners attached at emission time.
    async fn publish(&self, event: ProgressEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// Listener bookkeeping shared between the bus and its subscriptions.
pub(crate) type ListenerTable = Arc<RwLock<HashMap<u64, StepFilter>>>;

/// In-memory implementation of the progress bus.
///
/// Uses `tokio::sync::broadcast` for multi-consumer fan-out. Events published
/// while nobody listens are dropped.
pub struct InMemoryProgressBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<ProgressEvent>,

    /// Active listeners by subscription id.
    listeners: ListenerTable,

    /// Next subscription id.
    next_id: AtomicU64,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryProgressBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with the given per-listener capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Attach a new listener.
    ///
    /// The returned subscription receives only events published from now on.
    #[must_use]
    pub fn subscribe(&self, filter: StepFilter) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let receiver = self.sender.subscribe();
        self.listeners.write().insert(id, filter.clone());

        debug!(subscription_id = id, steps = ?filter.steps, "Progress listener attached");

        Subscription::new(id, receiver, filter, self.listeners.clone())
    }

    /// Detach a listener.
    ///
    /// Equivalent to dropping the subscription; returns whether it was still
    /// attached.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let attached = self.listeners.read().contains_key(&subscription.id());
        drop(subscription);
        attached
    }

    /// Get the number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryProgressBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressPublisher for InMemoryProgressBus {
    async fn publish(&self, event: ProgressEvent) -> usize {
        let step = event.step;
        let status = event.status;

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(%step, ?status, receivers, "Progress event published");
                receivers
            }
            Err(_) => {
                trace!(%step, ?status, "Progress event dropped (no listeners)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

/// Publisher that discards every event.
#[derive(Debug, Default)]
pub struct NoopProgressPublisher;

#[async_trait]
impl ProgressPublisher for NoopProgressPublisher {
    async fn publish(&self, _event: ProgressEvent) -> usize {
        0
    }

    fn events_published(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crset_types::PipelineStep;

    #[tokio::test]
    async fn test_publish_no_listeners() {
        let bus = InMemoryProgressBus::new();
        let receivers = bus
            .publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;

        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_with_listener() {
        let bus = InMemoryProgressBus::new();
        let _sub = bus.subscribe(StepFilter::all());

        let receivers = bus
            .publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;

        assert_eq!(receivers, 1);
        assert_eq!(bus.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_multiple_listeners() {
        let bus = InMemoryProgressBus::new();
        let _sub1 = bus.subscribe(StepFilter::all());
        let _sub2 = bus.subscribe(StepFilter::all());
        let _sub3 = bus.subscribe(StepFilter::steps(vec![PipelineStep::StoreLog]));

        let receivers = bus
            .publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;

        assert_eq!(receivers, 3);
        assert_eq!(bus.listener_count(), 3);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let bus = InMemoryProgressBus::new();
        let sub = bus.subscribe(StepFilter::all());
        let _other = bus.subscribe(StepFilter::all());

        assert!(bus.unsubscribe(sub));
        assert_eq!(bus.listener_count(), 1);

        let receivers = bus
            .publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;
        assert_eq!(receivers, 1);
    }

    #[test]
    fn test_default_bus() {
        let bus = InMemoryProgressBus::default();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_noop_publisher() {
        let publisher = NoopProgressPublisher;
        assert_eq!(
            publisher
                .publish(ProgressEvent::started(PipelineStep::StoreLog))
                .await,
            0
        );
    }
}
