use std::time::Duration;

use ubxprims_frame::FrameConfig;

/// Default retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 19;
/// Default wait per attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
/// Default pause after an empty read.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// Bounded retry schedule for one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait per attempt.
    pub timeout: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, timeout: Duration) -> Self {
        Self {
            max_retries,
            timeout,
        }
    }

    /// A single attempt.
    pub const fn once(timeout: Duration) -> Self {
        Self::new(0, timeout)
    }

    /// Total number of requests that will be sent.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT)
    }
}

/// Session-wide settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Policy used by [`Controller::poll`](crate::Controller::poll) and
    /// [`Controller::configure`](crate::Controller::configure).
    pub retry: RetryPolicy,
    /// Pause after a read that returned no bytes.
    pub idle_interval: Duration,
    /// Payload limit and read chunk size.
    pub frame: FrameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            idle_interval: DEFAULT_IDLE_INTERVAL,
            frame: FrameConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 20);
        assert_eq!(policy.timeout, Duration::from_millis(500));
        assert_eq!(RetryPolicy::once(Duration::ZERO).attempts(), 1);
        assert_eq!(RetryPolicy::new(u32::MAX, Duration::ZERO).attempts(), u32::MAX);

        let config = SessionConfig::default();
        assert_eq!(config.idle_interval, Duration::from_millis(10));
        assert_eq!(config.frame.read_chunk_size, 512);
    }
}
