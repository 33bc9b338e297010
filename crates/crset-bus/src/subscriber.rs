//! # Progress Subscriber
//!
//! Defines the listening side of the progress bus.

use crate::filter::StepFilter;
use crate::publisher::ListenerTable;
use crset_types::ProgressEvent;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Progress bus closed")]
    Closed,
}

/// Removes the listener from the bus table when dropped.
struct ListenerGuard {
    id: u64,
    listeners: ListenerTable,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.listeners.write().remove(&self.id);
        debug!(subscription_id = self.id, "Progress listener detached");
    }
}

/// A subscription handle for receiving progress events.
///
/// When dropped, the listener is detached from the bus.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<ProgressEvent>,

    /// Filter for this subscription.
    filter: StepFilter,

    /// Detaches the listener on drop.
    guard: ListenerGuard,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        id: u64,
        receiver: broadcast::Receiver<ProgressEvent>,
        filter: StepFilter,
        listeners: ListenerTable,
    ) -> Self {
        Self {
            receiver,
            filter,
            guard: ListenerGuard { id, listeners },
        }
    }

    /// Identifier assigned by the bus.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.guard.id
    }

    /// Receive the next event that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next matching event
    /// - `None` - The bus was dropped
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Listener lagged, progress events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Try to receive the next event without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - No event available
    /// - `Err(SubscriptionError::Closed)` - The bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<ProgressEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &StepFilter {
        &self.filter
    }

    /// Convert into a `Stream` of matching events.
    #[must_use]
    pub fn into_stream(self) -> ProgressStream {
        ProgressStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            _guard: self.guard,
        }
    }
}

/// A stream of progress events for use with stream combinators.
///
/// Lagged gaps are skipped; the stream ends when the bus is dropped.
pub struct ProgressStream {
    inner: BroadcastStream<ProgressEvent>,
    filter: StepFilter,
    _guard: ListenerGuard,
}

impl ProgressStream {
    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &StepFilter {
        &self.filter
    }
}

impl Stream for ProgressStream {
    type Item = ProgressEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(event)) if this.filter.matches(&event) => return Poll::Ready(Some(event)),
                Some(Ok(_)) => continue,
                Some(Err(lagged)) => {
                    debug!(error = %lagged, "Progress stream lagged");
                    continue;
                }
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::InMemoryProgressBus;
    use crate::ProgressPublisher;
    use crset_types::PipelineStep;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_subscription_recv() {
        let bus = InMemoryProgressBus::new();
        let mut sub = bus.subscribe(StepFilter::all());

        bus.publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(received.step, PipelineStep::QueryStatus);
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let bus = InMemoryProgressBus::new();
        let mut sub = bus.subscribe(StepFilter::steps(vec![PipelineStep::StoreLog]));

        bus.publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;
        bus.publish(ProgressEvent::started(PipelineStep::StoreLog))
            .await;

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(received.step, PipelineStep::StoreLog);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_replay() {
        let bus = InMemoryProgressBus::new();
        let _early = bus.subscribe(StepFilter::all());

        bus.publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;

        let mut late = bus.subscribe(StepFilter::all());
        assert!(matches!(late.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_lagging_listener_loses_oldest_events() {
        let bus = InMemoryProgressBus::with_capacity(2);
        let mut sub = bus.subscribe(StepFilter::all());

        bus.publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;
        bus.publish(ProgressEvent::started(PipelineStep::ConstructCascade))
            .await;
        bus.publish(ProgressEvent::started(PipelineStep::SerializeCascade))
            .await;

        let first = sub.try_recv().unwrap().unwrap();
        assert_eq!(first.step, PipelineStep::ConstructCascade);
    }

    #[tokio::test]
    async fn test_subscription_drop_cleanup() {
        let bus = InMemoryProgressBus::new();

        {
            let _sub1 = bus.subscribe(StepFilter::all());
            let _sub2 = bus.subscribe(StepFilter::all());
            assert_eq!(bus.listener_count(), 2);
        }

        assert_eq!(bus.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_try_recv_closed() {
        let bus = InMemoryProgressBus::new();
        let mut sub = bus.subscribe(StepFilter::all());
        drop(bus);

        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
    }

    #[tokio::test]
    async fn test_stream_yields_matching_events() {
        let bus = InMemoryProgressBus::new();
        let mut stream = bus
            .subscribe(StepFilter::steps(vec![PipelineStep::ComputeCosts]))
            .into_stream();

        bus.publish(ProgressEvent::started(PipelineStep::QueryStatus))
            .await;
        bus.publish(ProgressEvent::completed(PipelineStep::ComputeCosts))
            .await;

        let event = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(event.step, PipelineStep::ComputeCosts);
        assert_eq!(bus.listener_count(), 1);

        drop(stream);
        assert_eq!(bus.listener_count(), 0);
    }
}
