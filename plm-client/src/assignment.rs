//! Broker assignment sets and the TTL-bounded assignment cache
//!
//! An assignment maps a broker to the partitions this consumer should
//! read from it. The cache holds the last resolved set as an immutable
//! snapshot behind an `Arc`; replacement swaps the whole snapshot, so
//! readers see either the old set or the new one, never a mix.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use plm_core::{Broker, TopicMetadata};

/// One broker together with the partitions a consumer should read from
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAssignment {
    pub broker: Broker,
    pub partitions: Vec<u16>,
}

/// Ordered set of broker assignments.
///
/// Empty is a valid state meaning "nothing available right now", not a
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerAssignments {
    assignments: Vec<BrokerAssignment>,
}

impl BrokerAssignments {
    pub fn new(assignments: Vec<BrokerAssignment>) -> Self {
        Self { assignments }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrokerAssignment> {
        self.assignments.iter()
    }

    pub fn as_slice(&self) -> &[BrokerAssignment] {
        &self.assignments
    }

    /// The static full set: every broker that leads at least one
    /// partition, in first-seen partition order.
    pub fn all_leaders(metadata: &TopicMetadata) -> Self {
        let mut assignments: Vec<BrokerAssignment> = Vec::new();
        for partition in &metadata.partitions {
            let Some(leader) = &partition.leader else {
                continue;
            };
            match assignments.iter_mut().find(|a| a.broker.id == leader.id) {
                Some(existing) => existing.partitions.push(partition.id),
                None => assignments.push(BrokerAssignment {
                    broker: leader.clone(),
                    partitions: vec![partition.id],
                }),
            }
        }
        Self { assignments }
    }

    /// Drop brokers that cannot serve reads right now.
    pub fn retain_available(mut self) -> Self {
        self.assignments.retain(|a| a.broker.can_serve_reads());
        self
    }

    /// Keep only brokers tagged with `region`; `None` keeps everything.
    pub fn retain_region(mut self, region: Option<&str>) -> Self {
        if let Some(region) = region {
            self.assignments
                .retain(|a| a.broker.region.as_deref() == Some(region));
        }
        self
    }
}

struct CacheEntry {
    assignments: BrokerAssignments,
    created: Instant,
}

/// TTL-bounded holder of the last resolved assignment set.
///
/// Concurrent misses may recompute redundantly; the last writer wins.
/// That race is tolerated by design of the resolver, which only ever
/// writes equivalent values for unchanged metadata.
pub(crate) struct AssignmentCache {
    entry: RwLock<Option<Arc<CacheEntry>>>,
}

impl AssignmentCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    /// The cached set, unless absent or older than `ttl`.
    pub fn get(&self, ttl: Duration) -> Option<BrokerAssignments> {
        let slot = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        let entry = slot.as_ref()?;
        if entry.created.elapsed() > ttl {
            return None;
        }
        Some(entry.assignments.clone())
    }

    /// Replace the cached snapshot wholesale, stamped now.
    pub fn replace(&self, assignments: BrokerAssignments) {
        let entry = Arc::new(CacheEntry {
            assignments,
            created: Instant::now(),
        });
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }
}
