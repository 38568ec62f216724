use plm_core::ResultCode;
use thiserror::Error;

/// Errors surfaced by the polling client.
///
/// An empty broker set is never an error: topic polls against a topic
/// with nothing available return an empty batch instead.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// Invalid configuration detected at construction time
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Operation attempted before start() or after stop()
    #[error("consumer is not started")]
    ServiceUnavailable,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Partition missing, leaderless, or unreadable. One shared kind;
    /// the reason text names the cause.
    #[error("partition {reason}, topic: {topic}, partition: {partition}")]
    PartitionUnavailable {
        topic: String,
        partition: u16,
        reason: &'static str,
    },

    /// The assignment coordinator could not be reached or rejected the
    /// request
    #[error("coordinator error: {0}")]
    Coordinator(String),

    /// Cluster metadata service failure
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Fetch transport failure
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Commit transport failure below the ResultCode layer
    #[error("commit error: {0}")]
    Commit(String),
}

impl ConsumerError {
    /// Outcome code corresponding to this error.
    pub fn code(&self) -> ResultCode {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) => ResultCode::InvalidArgument,
            Self::ServiceUnavailable => ResultCode::ServiceUnavailable,
            Self::PartitionUnavailable { .. } => ResultCode::PartitionUnavailable,
            Self::Commit(_) => ResultCode::CommitFailed,
            Self::Coordinator(_) | Self::Metadata(_) | Self::Fetch(_) => ResultCode::Unknown,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsumerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_unavailable_message_names_the_cause() {
        let err = ConsumerError::PartitionUnavailable {
            topic: "orders".to_string(),
            partition: 1,
            reason: "not available",
        };
        assert_eq!(
            err.to_string(),
            "partition not available, topic: orders, partition: 1"
        );
        assert_eq!(err.code(), ResultCode::PartitionUnavailable);
    }

    #[test]
    fn code_classification() {
        assert_eq!(
            ConsumerError::ServiceUnavailable.code(),
            ResultCode::ServiceUnavailable
        );
        assert_eq!(
            ConsumerError::InvalidArgument("x".into()).code(),
            ResultCode::InvalidArgument
        );
        assert_eq!(
            ConsumerError::Coordinator("down".into()).code(),
            ResultCode::Unknown
        );
    }
}
