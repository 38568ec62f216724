//! Broker selection strategies
//!
//! Selection is a pluggable seam: the poller only requires that a
//! strategy picks one member of the resolved set. The stock strategy
//! rotates through the set; deployments with richer placement logic
//! supply their own implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::assignment::{BrokerAssignment, BrokerAssignments};

/// Picks exactly one assignment from a resolved set.
///
/// Contract: the returned assignment is a member of the input set.
/// `None` only for an empty set.
pub trait BrokerLoadBalance: Send + Sync {
    fn select<'a>(&self, assignments: &'a BrokerAssignments) -> Option<&'a BrokerAssignment>;
}

/// Rotates through the assignment set in arrival order.
#[derive(Debug, Default)]
pub struct RoundRobinLoadBalance {
    cursor: AtomicU64,
}

impl RoundRobinLoadBalance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BrokerLoadBalance for RoundRobinLoadBalance {
    fn select<'a>(&self, assignments: &'a BrokerAssignments) -> Option<&'a BrokerAssignment> {
        if assignments.is_empty() {
            return None;
        }
        let slot = self.cursor.fetch_add(1, Ordering::Relaxed) as usize % assignments.len();
        assignments.as_slice().get(slot)
    }
}
