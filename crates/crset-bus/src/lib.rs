//! # CRSet Bus - Progress Event Broadcast
//!
//! Carries `ProgressEvent`s from the publication pipeline to any number of
//! listeners.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Orchestrator │                    │  Listener N  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Progress Bus │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery Semantics
//!
//! - **Fire-and-forget:** `publish` never fails and never blocks the caller.
//! - **No replay:** a listener only sees events published after it subscribed.
//! - **No backpressure:** a listener that falls more than the channel
//!   capacity behind silently loses the oldest events.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod filter;
pub mod publisher;
pub mod subscriber;

pub use filter::StepFilter;
pub use publisher::{InMemoryProgressBus, NoopProgressPublisher, ProgressPublisher};
pub use subscriber::{ProgressStream, Subscription, SubscriptionError};

/// Maximum events buffered per listener before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 256);
    }
}
