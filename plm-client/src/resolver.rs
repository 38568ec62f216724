//! Broker-assignment resolution
//!
//! Decides which brokers are eligible to serve a topic-wide poll. The
//! resolved set comes from a TTL-bounded cache, the coordinator's
//! balanced assignment, or the static full-leader set, in that order
//! of preference. Failover trades balance for availability: when the
//! coordinator is degraded or has not converged yet, every partition
//! leader becomes eligible rather than nothing.

use std::sync::Arc;

use tracing::{debug, warn};

use plm_core::TopicMetadata;

use crate::assignment::{AssignmentCache, BrokerAssignments};
use crate::config::ConsumerConfig;
use crate::coordinator::AssignmentCoordinator;
use crate::error::Result;

pub(crate) struct AssignmentResolver {
    config: ConsumerConfig,
    coordinator: Arc<dyn AssignmentCoordinator>,
    cache: AssignmentCache,
}

impl AssignmentResolver {
    pub fn new(config: ConsumerConfig, coordinator: Arc<dyn AssignmentCoordinator>) -> Self {
        Self {
            config,
            coordinator,
            cache: AssignmentCache::new(),
        }
    }

    /// Brokers eligible to serve a topic-wide poll.
    ///
    /// Empty means "nothing available right now" and is not an error.
    /// Two tasks racing through a cache miss may both recompute; the
    /// outcome is idempotent for unchanged metadata and the last
    /// writer wins.
    pub async fn resolve(&self, metadata: &TopicMetadata) -> Result<BrokerAssignments> {
        if let Some(cached) = self.cache.get(self.config.session_timeout) {
            return Ok(cached);
        }

        let assignments = if self.config.load_balance {
            self.resolve_dynamic(metadata).await?
        } else {
            BrokerAssignments::all_leaders(metadata)
        };
        let assignments = assignments.retain_region(self.config.region.as_deref());

        // Partially-degraded metadata must not pin a shrunken set for
        // a whole TTL.
        if metadata.is_all_available() {
            self.cache.replace(assignments.clone());
        }

        Ok(assignments)
    }

    async fn resolve_dynamic(&self, metadata: &TopicMetadata) -> Result<BrokerAssignments> {
        let fetched = self
            .coordinator
            .fetch_assignment(metadata, &self.config.full_app_name(), self.config.session_timeout)
            .await;

        let filtered = match fetched {
            Ok(assignments) => assignments.retain_available(),
            Err(err) if self.config.failover => {
                warn!(
                    topic = %metadata.name,
                    error = %err,
                    "coordinator unavailable, assigning all partition leaders"
                );
                return Ok(BrokerAssignments::all_leaders(metadata));
            }
            Err(err) => return Err(err),
        };

        if filtered.is_empty() && self.config.failover {
            debug!(topic = %metadata.name, "no balanced assignment, assigning all partition leaders");
            return Ok(BrokerAssignments::all_leaders(metadata));
        }

        Ok(filtered)
    }
}
