//! Lifecycle gating for the poller
//!
//! Every public operation is gated on the poller being started. Start
//! and stop are single-writer control-path operations; the gate only
//! has to keep the read side (the poll path) cheap, so state lives in
//! one atomic.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{ConsumerError, Result};

/// Lifecycle states of the poller. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ServiceState {
    Created = 0,
    Validating = 1,
    Started = 2,
    Stopping = 3,
    Stopped = 4,
}

impl ServiceState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Created,
            1 => Self::Validating,
            2 => Self::Started,
            3 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// How a stop request should proceed given the current state.
pub(crate) enum StopPath {
    /// Already stopping or stopped
    Noop,
    /// Never started; no collaborators to unwind
    Bare,
    /// Started collaborators need to be stopped
    Drain,
}

/// Guarded lifecycle transitions.
pub(crate) struct LifecycleGate {
    state: AtomicU8,
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ServiceState::Created as u8),
        }
    }

    pub fn state(&self) -> ServiceState {
        ServiceState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Err unless the poller is started.
    pub fn check_started(&self) -> Result<()> {
        match self.state() {
            ServiceState::Started => Ok(()),
            _ => Err(ConsumerError::ServiceUnavailable),
        }
    }

    /// Move Created -> Validating. `Ok(false)` when already started
    /// (start becomes a no-op); Err once stopping has begun.
    pub fn begin_start(&self) -> Result<bool> {
        if self.transition(ServiceState::Created, ServiceState::Validating) {
            return Ok(true);
        }
        match self.state() {
            ServiceState::Started => Ok(false),
            _ => Err(ConsumerError::ServiceUnavailable),
        }
    }

    /// Validating -> Started.
    pub fn finish_start(&self) {
        self.transition(ServiceState::Validating, ServiceState::Started);
    }

    /// Validating -> Created, after a collaborator failed to start.
    pub fn abort_start(&self) {
        self.transition(ServiceState::Validating, ServiceState::Created);
    }

    /// Enter Stopping and report what remains to be unwound.
    pub fn begin_stop(&self) -> StopPath {
        if self.transition(ServiceState::Started, ServiceState::Stopping) {
            return StopPath::Drain;
        }
        if self.transition(ServiceState::Created, ServiceState::Stopping) {
            return StopPath::Bare;
        }
        StopPath::Noop
    }

    /// Stopping -> Stopped.
    pub fn finish_stop(&self) {
        self.state
            .store(ServiceState::Stopped as u8, Ordering::Release);
    }

    fn transition(&self, from: ServiceState, to: ServiceState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
