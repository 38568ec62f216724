//! Assignment coordinator seam.

use std::time::Duration;

use async_trait::async_trait;

use plm_core::TopicMetadata;

use crate::assignment::BrokerAssignments;
use crate::error::Result;

/// External coordinator computing balanced broker assignments across
/// the cooperating consumers of one application.
#[async_trait]
pub trait AssignmentCoordinator: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self);

    /// Balanced assignment for this consumer, leased for `lease`.
    ///
    /// May fail when the coordinator is unreachable; the resolver
    /// decides whether failover substitutes a fallback set.
    async fn fetch_assignment(
        &self,
        metadata: &TopicMetadata,
        full_app: &str,
        lease: Duration,
    ) -> Result<BrokerAssignments>;
}
