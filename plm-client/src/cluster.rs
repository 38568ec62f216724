//! Cluster metadata service seam.

use async_trait::async_trait;

use plm_core::TopicMetadata;

use crate::error::Result;

/// External source of topic metadata.
///
/// The poller fetches a fresh snapshot per operation and never caches
/// at this layer; staleness policy belongs to the implementation.
#[async_trait]
pub trait ClusterMetadata: Send + Sync {
    /// Topology snapshot for a topic, on behalf of `full_app`.
    async fn fetch_topic_metadata(&self, full_topic: &str, full_app: &str)
        -> Result<TopicMetadata>;
}
