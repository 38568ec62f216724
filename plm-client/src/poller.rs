//! Topic and partition polling
//!
//! The [`MessagePoller`] is the consumer-facing entry point: it gates
//! every operation behind the lifecycle, routes topic-wide polls to
//! one broker of the resolved assignment set, validates direct
//! partition access against fresh metadata, and commits acknowledgment
//! batches one at a time.
//!
//! # Example
//!
//! ```text
//! let poller = MessagePoller::new(config, cluster, coordinator, fetcher, committer, balance)?;
//! poller.start().await?;
//!
//! let messages = poller.poll("orders").await?;
//! let replies: Vec<ConsumeReply> = messages
//!     .iter()
//!     .map(|m| ConsumeReply::for_message(m, ReplyStatus::Success))
//!     .collect();
//! if !replies.is_empty() {
//!     poller.reply("orders", &replies).await?;
//! }
//!
//! poller.stop().await;
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use plm_core::{Broker, ConsumeMessage, ConsumeReply, ResultCode, TopicMetadata};

use crate::balance::BrokerLoadBalance;
use crate::cluster::ClusterMetadata;
use crate::config::ConsumerConfig;
use crate::coordinator::AssignmentCoordinator;
use crate::error::{ConsumerError, Result};
use crate::index::IndexCommitter;
use crate::lifecycle::{LifecycleGate, ServiceState, StopPath};
use crate::resolver::AssignmentResolver;
use crate::transport::{ConsumerListener, MessageFetcher, PartitionFetch, TopicFetch};

/// Per-call polling options. `None` fields fall back to the configured
/// defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollOptions {
    /// Fetch batch size (None = config override, else topic policy)
    pub batch_size: Option<u16>,
    /// Poll timeout (None = configured poll_timeout)
    pub timeout: Option<Duration>,
    /// Explicit starting index for partition polls (None = the
    /// application's committed position)
    pub index: Option<u64>,
}

impl PollOptions {
    pub fn with_batch_size(mut self, batch_size: u16) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }
}

/// Consumer-side polling orchestrator for a PLUME cluster.
///
/// Safe to share across tasks: polls and replies may run concurrently
/// on one instance. `start()`/`stop()` are single-writer control-path
/// operations and must not race each other.
pub struct MessagePoller {
    config: ConsumerConfig,
    cluster: Arc<dyn ClusterMetadata>,
    coordinator: Arc<dyn AssignmentCoordinator>,
    fetcher: Arc<dyn MessageFetcher>,
    committer: Arc<dyn IndexCommitter>,
    balance: Arc<dyn BrokerLoadBalance>,
    resolver: AssignmentResolver,
    gate: LifecycleGate,
    /// At most one acknowledgment commit in flight per poller
    commit_gate: Mutex<()>,
}

impl MessagePoller {
    /// Build a poller over the given collaborators.
    ///
    /// Fails fast with [`ConsumerError::Config`] when the configuration
    /// is invalid; nothing is wired until [`start`](Self::start).
    pub fn new(
        config: ConsumerConfig,
        cluster: Arc<dyn ClusterMetadata>,
        coordinator: Arc<dyn AssignmentCoordinator>,
        fetcher: Arc<dyn MessageFetcher>,
        committer: Arc<dyn IndexCommitter>,
        balance: Arc<dyn BrokerLoadBalance>,
    ) -> Result<Self> {
        config.validate()?;
        let resolver = AssignmentResolver::new(config.clone(), Arc::clone(&coordinator));
        Ok(Self {
            config,
            cluster,
            coordinator,
            fetcher,
            committer,
            balance,
            resolver,
            gate: LifecycleGate::new(),
            commit_gate: Mutex::new(()),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceState {
        self.gate.state()
    }

    /// Start the poller: fetch transport first, then the coordinator.
    ///
    /// A collaborator failing to start unwinds the ones already
    /// started and leaves the poller startable again. Starting an
    /// already-started poller is a no-op.
    pub async fn start(&self) -> Result<()> {
        if !self.gate.begin_start()? {
            return Ok(());
        }

        if let Err(err) = self.fetcher.start().await {
            self.gate.abort_start();
            return Err(err);
        }
        if let Err(err) = self.coordinator.start().await {
            self.fetcher.stop().await;
            self.gate.abort_start();
            return Err(err);
        }

        self.gate.finish_start();
        info!(app = %self.config.app, "message poller started");
        Ok(())
    }

    /// Stop the poller. Terminal: a stopped poller cannot be restarted.
    ///
    /// New operations are refused first, then the coordinator and the
    /// fetch transport are stopped in reverse start order. Fetches
    /// already handed to the transport are not cancelled. Collaborators
    /// that never started are skipped.
    pub async fn stop(&self) {
        match self.gate.begin_stop() {
            StopPath::Noop => {}
            StopPath::Bare => self.gate.finish_stop(),
            StopPath::Drain => {
                self.coordinator.stop().await;
                self.fetcher.stop().await;
                self.gate.finish_stop();
                info!(app = %self.config.app, "message poller stopped");
            }
        }
    }

    /// Poll a batch from any eligible broker of `topic` with default
    /// options.
    pub async fn poll(&self, topic: &str) -> Result<Vec<ConsumeMessage>> {
        self.poll_topic(topic, &PollOptions::default()).await
    }

    /// Poll at most one message from `topic`.
    pub async fn poll_once(&self, topic: &str) -> Result<Option<ConsumeMessage>> {
        let options = PollOptions::default().with_batch_size(1);
        Ok(self.poll_topic(topic, &options).await?.into_iter().next())
    }

    /// Topic-wide poll: resolve the eligible brokers, pick one, fetch.
    ///
    /// Blocks up to the effective timeout (long-poll semantics). An
    /// empty batch means nothing was available in time, including the
    /// case where no broker is currently eligible.
    pub async fn poll_topic(
        &self,
        topic: &str,
        options: &PollOptions,
    ) -> Result<Vec<ConsumeMessage>> {
        self.dispatch_topic(topic, options, None).await
    }

    /// Topic-wide poll delivered through `listener`.
    ///
    /// Returns once the fetch is dispatched; the listener fires exactly
    /// once with the outcome. Lifecycle and argument violations still
    /// fail the caller directly, before any I/O.
    pub async fn poll_topic_async(
        &self,
        topic: &str,
        options: &PollOptions,
        listener: Arc<dyn ConsumerListener>,
    ) -> Result<()> {
        self.dispatch_topic(topic, options, Some(listener)).await?;
        Ok(())
    }

    /// Poll one partition of `topic` with default options.
    pub async fn poll_partition(
        &self,
        topic: &str,
        partition: u16,
        options: &PollOptions,
    ) -> Result<Vec<ConsumeMessage>> {
        self.dispatch_partition(topic, partition, options, None)
            .await
    }

    /// Poll at most one message from a single partition.
    pub async fn poll_partition_once(
        &self,
        topic: &str,
        partition: u16,
    ) -> Result<Option<ConsumeMessage>> {
        let options = PollOptions::default().with_batch_size(1);
        Ok(self
            .poll_partition(topic, partition, &options)
            .await?
            .into_iter()
            .next())
    }

    /// Single-partition poll delivered through `listener`; semantics as
    /// for [`poll_topic_async`](Self::poll_topic_async).
    pub async fn poll_partition_async(
        &self,
        topic: &str,
        partition: u16,
        options: &PollOptions,
        listener: Arc<dyn ConsumerListener>,
    ) -> Result<()> {
        self.dispatch_partition(topic, partition, options, Some(listener))
            .await?;
        Ok(())
    }

    /// Commit a batch of acknowledgments for `topic`.
    ///
    /// Serialized: at most one commit runs at a time per poller, so
    /// interleaved partial commits cannot reach the shared position
    /// store. A non-success code is logged and returned, never raised;
    /// retry policy belongs to the caller.
    pub async fn reply(&self, topic: &str, replies: &[ConsumeReply]) -> Result<ResultCode> {
        self.gate.check_started()?;
        check_topic(topic)?;
        if replies.is_empty() {
            return Err(ConsumerError::InvalidArgument(format!(
                "reply batch for topic {} is empty",
                topic
            )));
        }

        let _commit = self.commit_gate.lock().await;
        let code = self
            .committer
            .commit_reply(
                &self.config.full_topic_name(topic),
                replies,
                &self.config.full_app_name(),
                self.config.commit_timeout,
            )
            .await?;

        if !code.is_success() {
            warn!(topic = topic, code = %code, "acknowledgment commit rejected");
        }
        Ok(code)
    }

    /// Commit a single acknowledgment.
    pub async fn reply_once(&self, topic: &str, reply: ConsumeReply) -> Result<ResultCode> {
        self.reply(topic, std::slice::from_ref(&reply)).await
    }

    /// Fresh topic metadata snapshot; never cached at this layer.
    pub async fn topic_metadata(&self, topic: &str) -> Result<TopicMetadata> {
        self.gate.check_started()?;
        check_topic(topic)?;
        self.fetch_metadata(topic).await
    }

    async fn dispatch_topic(
        &self,
        topic: &str,
        options: &PollOptions,
        listener: Option<Arc<dyn ConsumerListener>>,
    ) -> Result<Vec<ConsumeMessage>> {
        self.gate.check_started()?;
        check_topic(topic)?;

        let metadata = self.fetch_metadata(topic).await?;
        let assignments = self.resolver.resolve(&metadata).await?.retain_available();

        if assignments.is_empty() {
            warn!(topic = topic, "no broker available");
            return Ok(empty_result(listener));
        }

        let Some(assignment) = self.balance.select(&assignments) else {
            // select() only declines on empty input, which was handled
            // above; treat a misbehaving strategy like an empty set
            warn!(topic = topic, "load balance strategy selected nothing");
            return Ok(empty_result(listener));
        };
        let broker = assignment.broker.clone();

        self.fetcher
            .fetch_topic(TopicFetch {
                broker,
                batch_size: self.effective_batch_size(options, &metadata),
                timeout: options.timeout.unwrap_or(self.config.poll_timeout),
                metadata,
                listener,
            })
            .await
    }

    async fn dispatch_partition(
        &self,
        topic: &str,
        partition: u16,
        options: &PollOptions,
        listener: Option<Arc<dyn ConsumerListener>>,
    ) -> Result<Vec<ConsumeMessage>> {
        self.gate.check_started()?;
        check_topic(topic)?;

        let metadata = self.fetch_metadata(topic).await?;
        let leader = check_partition(&metadata, topic, partition)?.clone();

        self.fetcher
            .fetch_partition(PartitionFetch {
                broker: leader,
                partition,
                index: options.index,
                batch_size: self.effective_batch_size(options, &metadata),
                timeout: options.timeout.unwrap_or(self.config.poll_timeout),
                metadata,
                listener,
            })
            .await
    }

    async fn fetch_metadata(&self, topic: &str) -> Result<TopicMetadata> {
        self.cluster
            .fetch_topic_metadata(
                &self.config.full_topic_name(topic),
                &self.config.full_app_name(),
            )
            .await
    }

    /// Caller's batch size, else the configured override, else the
    /// topic policy default.
    fn effective_batch_size(&self, options: &PollOptions, metadata: &TopicMetadata) -> u16 {
        options
            .batch_size
            .or(self.config.batch_size)
            .unwrap_or(metadata.policy.batch_size)
    }
}

impl fmt::Debug for MessagePoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagePoller")
            .field("app", &self.config.app)
            .field("state", &self.state())
            .finish()
    }
}

fn check_topic(topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        return Err(ConsumerError::InvalidArgument(
            "topic must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Partition access checks, first failure wins: existence, then
/// leadership, then read permission.
fn check_partition<'a>(
    metadata: &'a TopicMetadata,
    topic: &str,
    partition: u16,
) -> Result<&'a Broker> {
    let Some(partition_metadata) = metadata.partition(partition) else {
        return Err(partition_unavailable(topic, partition, "not exist"));
    };
    let Some(leader) = partition_metadata.leader.as_ref() else {
        return Err(partition_unavailable(topic, partition, "not available"));
    };
    if !leader.readable {
        return Err(partition_unavailable(topic, partition, "no permission"));
    }
    Ok(leader)
}

fn partition_unavailable(topic: &str, partition: u16, reason: &'static str) -> ConsumerError {
    ConsumerError::PartitionUnavailable {
        topic: topic.to_string(),
        partition,
        reason,
    }
}

fn empty_result(listener: Option<Arc<dyn ConsumerListener>>) -> Vec<ConsumeMessage> {
    if let Some(listener) = listener {
        listener.on_messages(Vec::new());
    }
    Vec::new()
}
