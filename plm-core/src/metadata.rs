//! Cluster topology snapshots used for poll routing
//!
//! Metadata is fetched fresh from the cluster per operation; nothing in
//! this module caches. A snapshot describes the cluster as it looked at
//! fetch time, including per-broker reachability and read permission.

use crate::DEFAULT_BATCH_SIZE;

/// A cluster node serving one or more partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broker {
    /// Cluster-wide broker id
    pub id: u32,
    /// host:port the broker serves fetch traffic on
    pub addr: String,
    /// Region tag for locality-aware routing (None = untagged)
    pub region: Option<String>,
    /// Whether the broker was reachable at snapshot time
    pub reachable: bool,
    /// Whether the broker grants read access to this consumer
    pub readable: bool,
}

impl Broker {
    /// Create a reachable, readable broker with no region tag.
    pub fn new(id: u32, addr: impl Into<String>) -> Self {
        Self {
            id,
            addr: addr.into(),
            region: None,
            reachable: true,
            readable: true,
        }
    }

    /// Tag the broker with a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the reachability flag
    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    /// Set the read-permission flag
    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    /// True when the broker can serve fetches right now.
    pub fn can_serve_reads(&self) -> bool {
        self.reachable && self.readable
    }
}

/// Metadata for a single partition of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMetadata {
    /// Partition id within the topic
    pub id: u16,
    /// Broker currently authoritative for this partition, if any
    pub leader: Option<Broker>,
}

impl PartitionMetadata {
    pub fn new(id: u16, leader: Option<Broker>) -> Self {
        Self { id, leader }
    }
}

/// Per-topic consumer policy pushed down from the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerPolicy {
    /// Default fetch batch size for consumers of this topic
    pub batch_size: u16,
}

impl Default for ConsumerPolicy {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Snapshot of a topic's layout: its partitions in cluster order plus
/// the consumer policy in force.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    /// Fully-qualified topic name
    pub name: String,
    /// Partitions in cluster order
    pub partitions: Vec<PartitionMetadata>,
    /// Consumer policy in force for the topic
    pub policy: ConsumerPolicy,
}

impl TopicMetadata {
    pub fn new(
        name: impl Into<String>,
        partitions: Vec<PartitionMetadata>,
        policy: ConsumerPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            partitions,
            policy,
        }
    }

    /// Look up a partition by id.
    pub fn partition(&self, id: u16) -> Option<&PartitionMetadata> {
        self.partitions.iter().find(|p| p.id == id)
    }

    /// True when every partition has a reachable, readable leader.
    ///
    /// A topic with no partitions reports unavailable: an empty
    /// snapshot says nothing about the real layout.
    pub fn is_all_available(&self) -> bool {
        !self.partitions.is_empty()
            && self
                .partitions
                .iter()
                .all(|p| p.leader.as_ref().is_some_and(|l| l.can_serve_reads()))
    }
}
