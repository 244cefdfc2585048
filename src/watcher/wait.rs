//! Bounded waiting on filesystem conditions.
//!
//! Sleeping goes through the [`Clock`] trait so the watcher loop and
//! [`wait_for`] can be driven without real delays in tests.

use std::{thread, time::Duration};

/// Source of blocking sleeps.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// Clock backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// How often and how long [`wait_for`] checks its condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    /// Check every half second for up to twenty seconds.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(20),
        }
    }
}

impl WaitPolicy {
    /// Number of times the condition is checked; always at least one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }

        let attempts = self.timeout.as_millis() / self.interval.as_millis().max(1);
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}

/// Check `condition` until it holds or the policy runs out of attempts.
///
/// The condition is checked before each sleep, so a condition that already
/// holds returns immediately without sleeping. Returns whether the condition
/// was observed to hold.
pub fn wait_for<C, F>(clock: &C, policy: WaitPolicy, mut condition: F) -> bool
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    for _ in 0..policy.attempts() {
        if condition() {
            return true;
        }
        clock.sleep(policy.interval);
    }

    false
}

/// Clock that records requested sleeps instead of blocking.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingClock {
    sleeps: std::cell::RefCell<Vec<Duration>>,
}

#[cfg(test)]
impl RecordingClock {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[cfg(test)]
impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
