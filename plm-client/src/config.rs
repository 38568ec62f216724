//! Consumer configuration
//!
//! A [`ConsumerConfig`] is handed to the poller at construction and
//! never changes afterwards. Validation happens once, up front; a
//! poller is never built over an invalid config.

use std::time::Duration;

use crate::error::{ConsumerError, Result};

/// Configuration for a message poller.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Application (consumer) name; must be non-blank
    pub app: String,
    /// Namespace prefix used to build fully-qualified topic names
    pub namespace: Option<String>,
    /// Subscription group appended to the full application identity
    pub group: Option<String>,
    /// Upper bound a synchronous poll may block
    pub poll_timeout: Duration,
    /// Broker-side hold time for long-poll fetches; must stay below
    /// `poll_timeout` so the client outlives the broker's wait
    pub long_poll_timeout: Duration,
    /// Fetch batch size override (None = per-topic policy default)
    pub batch_size: Option<u16>,
    /// Assignment cache TTL, and the lease duration requested from the
    /// coordinator
    pub session_timeout: Duration,
    /// Ask the coordinator for balanced assignments
    pub load_balance: bool,
    /// Fall back to every partition leader when the coordinator yields
    /// nothing
    pub failover: bool,
    /// Timeout for acknowledgment commits
    pub commit_timeout: Duration,
    /// Only poll brokers tagged with this region
    pub region: Option<String>,
}

impl ConsumerConfig {
    /// Create a configuration with defaults for everything but the
    /// application name.
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            namespace: None,
            group: None,
            poll_timeout: Duration::from_secs(10),
            long_poll_timeout: Duration::from_secs(5),
            batch_size: None,
            session_timeout: Duration::from_secs(60),
            load_balance: true,
            failover: true,
            commit_timeout: Duration::from_secs(10),
            region: None,
        }
    }

    /// Set the namespace prefix for topic names
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the subscription group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the synchronous poll timeout
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the broker-side long-poll hold time
    pub fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }

    /// Override the per-topic default batch size
    pub fn with_batch_size(mut self, batch_size: u16) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the assignment cache TTL / coordinator lease duration
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Enable or disable coordinator-balanced assignment
    pub fn with_load_balance(mut self, load_balance: bool) -> Self {
        self.load_balance = load_balance;
        self
    }

    /// Enable or disable the all-leaders fallback
    pub fn with_failover(mut self, failover: bool) -> Self {
        self.failover = failover;
        self
    }

    /// Set the acknowledgment commit timeout
    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = timeout;
        self
    }

    /// Restrict polling to brokers tagged with `region`
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Check the construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if self.app.trim().is_empty() {
            return Err(ConsumerError::Config("app must not be blank".to_string()));
        }
        if self.poll_timeout <= self.long_poll_timeout {
            return Err(ConsumerError::Config(format!(
                "poll_timeout ({:?}) must be greater than long_poll_timeout ({:?})",
                self.poll_timeout, self.long_poll_timeout
            )));
        }
        Ok(())
    }

    /// Fully-qualified topic name sent to cluster services.
    pub fn full_topic_name(&self, topic: &str) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{}.{}", namespace, topic),
            _ => topic.to_string(),
        }
    }

    /// Full application identity (app plus subscription group).
    pub fn full_app_name(&self) -> String {
        match self.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{}.{}", self.app, group),
            _ => self.app.clone(),
        }
    }
}
