//! Messages delivered to consumers and the acknowledgments they send
//! back. Both are identified by (topic, partition, index); payloads are
//! opaque to the client.

use bytes::Bytes;

/// A message handed to the consumer by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeMessage {
    pub topic: String,
    pub partition: u16,
    /// Position of the message within its partition
    pub index: u64,
    pub payload: Bytes,
}

impl ConsumeMessage {
    pub fn new(topic: impl Into<String>, partition: u16, index: u64, payload: Bytes) -> Self {
        Self {
            topic: topic.into(),
            partition,
            index,
            payload,
        }
    }
}

/// Disposition reported back for one consumed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyStatus {
    /// Processed; advance the committed position past this message
    #[default]
    Success,
    /// Processing failed; the broker should redeliver later
    Retry,
}

/// Acknowledgment record for one consumed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeReply {
    pub partition: u16,
    pub index: u64,
    pub status: ReplyStatus,
}

impl ConsumeReply {
    pub fn new(partition: u16, index: u64, status: ReplyStatus) -> Self {
        Self {
            partition,
            index,
            status,
        }
    }

    /// Successful acknowledgment for a delivered message.
    pub fn success(partition: u16, index: u64) -> Self {
        Self::new(partition, index, ReplyStatus::Success)
    }

    /// Redelivery request for a message that failed processing.
    pub fn retry(partition: u16, index: u64) -> Self {
        Self::new(partition, index, ReplyStatus::Retry)
    }

    /// Acknowledgment addressed at `message`.
    pub fn for_message(message: &ConsumeMessage, status: ReplyStatus) -> Self {
        Self::new(message.partition, message.index, status)
    }
}
