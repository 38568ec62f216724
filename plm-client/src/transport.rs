//! Fetch transport seam
//!
//! The transport owns the physical broker connections and the
//! long-poll wait. Requests carry an optional listener; with one
//! attached the transport dispatches in the background and reports the
//! outcome through the listener exactly once, on a task it owns.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use plm_core::{Broker, ConsumeMessage, TopicMetadata};

use crate::error::{ConsumerError, Result};

/// Receives the outcome of an asynchronously dispatched poll.
///
/// Fired exactly once per request: either `on_messages` with the fetch
/// result (possibly empty) or `on_error` with the failure. No ordering
/// guarantee exists across requests.
pub trait ConsumerListener: Send + Sync {
    fn on_messages(&self, messages: Vec<ConsumeMessage>);

    fn on_error(&self, error: ConsumerError);
}

/// Topic-wide fetch bound to one selected broker.
pub struct TopicFetch {
    pub broker: Broker,
    pub metadata: TopicMetadata,
    pub batch_size: u16,
    /// Long-poll bound: the fetch may return earlier with data, or at
    /// the timeout with an empty batch. Timing out is not an error.
    pub timeout: Duration,
    pub listener: Option<Arc<dyn ConsumerListener>>,
}

/// Single-partition fetch bound to the partition leader.
pub struct PartitionFetch {
    pub broker: Broker,
    pub metadata: TopicMetadata,
    pub partition: u16,
    /// None reads from the application's committed position; an
    /// explicit index bypasses position tracking and reads from that
    /// exact spot (replay and inspection).
    pub index: Option<u64>,
    pub batch_size: u16,
    pub timeout: Duration,
    pub listener: Option<Arc<dyn ConsumerListener>>,
}

/// Physical fetch transport.
///
/// Stopping the poller does not cancel fetches already handed to the
/// transport; they complete (or time out) on the transport's own
/// tasks.
#[async_trait]
pub trait MessageFetcher: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self);

    /// Long-poll fetch across the partitions the broker serves for
    /// this consumer. With a listener attached, returns immediately
    /// with an empty batch.
    async fn fetch_topic(&self, request: TopicFetch) -> Result<Vec<ConsumeMessage>>;

    /// Long-poll fetch against a single partition. Listener semantics
    /// as for [`fetch_topic`](Self::fetch_topic).
    async fn fetch_partition(&self, request: PartitionFetch) -> Result<Vec<ConsumeMessage>>;
}
