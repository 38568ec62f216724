//! Acknowledgment commit seam.

use std::time::Duration;

use async_trait::async_trait;

use plm_core::{ConsumeReply, ResultCode};

use crate::error::Result;

/// External store tracking consumption progress per application.
///
/// Rejections are reported through the returned [`ResultCode`], not as
/// errors; `Err` is reserved for transport-level failures.
#[async_trait]
pub trait IndexCommitter: Send + Sync {
    /// Commit a batch of acknowledgments for `full_app` on `full_topic`.
    async fn commit_reply(
        &self,
        full_topic: &str,
        replies: &[ConsumeReply],
        full_app: &str,
        timeout: Duration,
    ) -> Result<ResultCode>;
}
