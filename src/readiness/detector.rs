//! Decides when the child has finished its boot banner.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::ReadinessConfig;
use crate::readiness::buffer::OutputBuffer;

/// Which policy declared readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyReason {
    /// Separator followed by a prompt marker.
    Prompt,
    /// Output stopped growing for two consecutive polls.
    Stable,
    /// Absolute ceiling reached.
    Timeout,
}

/// Patterns and timings the detector works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub separator: Vec<u8>,
    pub prompt_marker: Vec<u8>,
    pub poll_interval: Duration,
    pub timeout: Duration,
    /// Consecutive non-growing polls needed by the stability fallback.
    pub stable_polls: u32,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::from(&ReadinessConfig::default())
    }
}

impl From<&ReadinessConfig> for ReadinessPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        Self {
            separator: config.separator.as_bytes().to_vec(),
            prompt_marker: config.prompt_marker.as_bytes().to_vec(),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            timeout: Duration::from_millis(config.timeout_ms),
            stable_polls: 2,
        }
    }
}

/// Single-shot readiness state machine.
///
/// Feed it on every chunk with [`observe`](Self::observe) and on every
/// poll tick with [`poll`](Self::poll). The first policy to match wins;
/// afterwards both return `None`.
#[derive(Debug)]
pub struct ReadinessDetector {
    policy: ReadinessPolicy,
    started: Instant,
    last_len: Option<usize>,
    unchanged_polls: u32,
    fired: Option<ReadyReason>,
}

impl ReadinessDetector {
    pub fn new(policy: ReadinessPolicy, started: Instant) -> Self {
        Self {
            policy,
            started,
            last_len: None,
            unchanged_polls: 0,
            fired: None,
        }
    }

    pub fn policy(&self) -> &ReadinessPolicy {
        &self.policy
    }

    /// Instant at which the timeout fallback fires.
    pub fn deadline(&self) -> Instant {
        self.started + self.policy.timeout
    }

    pub fn fired(&self) -> Option<ReadyReason> {
        self.fired
    }

    /// Check the primary pattern after a new chunk.
    pub fn observe(&mut self, buffer: &OutputBuffer) -> Option<ReadyReason> {
        if self.fired.is_some() {
            return None;
        }
        if self.prompt_visible(buffer) {
            return self.fire(ReadyReason::Prompt);
        }
        None
    }

    /// Periodic check: pattern, then stability, then timeout.
    pub fn poll(&mut self, buffer: &OutputBuffer, now: Instant) -> Option<ReadyReason> {
        if self.fired.is_some() {
            return None;
        }
        if self.prompt_visible(buffer) {
            return self.fire(ReadyReason::Prompt);
        }

        let len = buffer.len();
        if len > 0 && self.last_len == Some(len) {
            self.unchanged_polls += 1;
        } else {
            self.unchanged_polls = 0;
            self.last_len = Some(len);
        }
        if self.unchanged_polls >= self.policy.stable_polls {
            return self.fire(ReadyReason::Stable);
        }

        if now >= self.deadline() {
            return self.fire(ReadyReason::Timeout);
        }
        None
    }

    fn prompt_visible(&self, buffer: &OutputBuffer) -> bool {
        buffer
            .prompt_tail_offset(&self.policy.separator, &self.policy.prompt_marker)
            .is_some()
    }

    fn fire(&mut self, reason: ReadyReason) -> Option<ReadyReason> {
        tracing::debug!(?reason, "Readiness detected");
        self.fired = Some(reason);
        Some(reason)
    }
}
