//! Outcome taxonomy shared between the client and the cluster services.

use std::fmt;

/// Result of an operation as reported across the client/cluster
/// boundary. Commit stores and other collaborators return these rather
/// than raising, leaving retry policy to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    /// Partition missing, leaderless, or not readable
    PartitionUnavailable,
    /// Operation attempted outside the started lifecycle state
    ServiceUnavailable,
    InvalidArgument,
    /// The commit store rejected or failed an acknowledgment batch
    CommitFailed,
    Unknown,
}

impl ResultCode {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::PartitionUnavailable => "partition unavailable",
            Self::ServiceUnavailable => "service unavailable",
            Self::InvalidArgument => "invalid argument",
            Self::CommitFailed => "commit failed",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
