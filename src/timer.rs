//! Non-blocking countdown timers driven by the caller's clock.
//!
//! Nothing here sleeps. The control loop passes the current monotonic
//! time in milliseconds and polls the predicates each tick.

/// A one-shot countdown with an optional deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Countdown {
    deadline: Option<u64>,
    duration_ms: u64,
}

impl Countdown {
    /// A stopped timer.
    pub const fn new() -> Self {
        Self {
            deadline: None,
            duration_ms: 0,
        }
    }

    /// Arm the timer to expire `duration_ms` after `now_ms`.
    pub fn start(&mut self, duration_ms: u64, now_ms: u64) {
        self.duration_ms = duration_ms;
        self.deadline = Some(now_ms.saturating_add(duration_ms));
    }

    /// Re-arm with the duration of the last `start`.
    pub fn restart(&mut self, now_ms: u64) {
        self.start(self.duration_ms, now_ms);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Milliseconds left; 0 when stopped or already elapsed.
    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.deadline.map_or(0, |d| d.saturating_sub(now_ms))
    }

    /// Started and the deadline has been reached.
    pub fn expired(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|d| now_ms >= d)
    }

    /// Started and the deadline is still ahead.
    pub fn is_running(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|d| now_ms < d)
    }

    /// True exactly once after expiry; the timer is stopped afterwards.
    pub fn just_finished(&mut self, now_ms: u64) -> bool {
        if self.expired(now_ms) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_never_expires() {
        let t = Countdown::new();
        assert!(!t.expired(u64::MAX));
        assert!(!t.is_running(0));
        assert_eq!(t.remaining(10), 0);
    }

    #[test]
    fn counts_down_to_deadline() {
        let mut t = Countdown::new();
        t.start(300, 1_000);
        assert_eq!(t.remaining(1_000), 300);
        assert_eq!(t.remaining(1_250), 50);
        assert!(t.is_running(1_299));
        assert!(!t.expired(1_299));
        assert!(t.expired(1_300));
        assert!(!t.is_running(1_300));
        assert_eq!(t.remaining(2_000), 0);
    }

    #[test]
    fn just_finished_fires_once() {
        let mut t = Countdown::new();
        t.start(10, 0);
        assert!(!t.just_finished(9));
        assert!(t.just_finished(10));
        assert!(!t.just_finished(11));
        assert!(!t.expired(11));
    }

    #[test]
    fn restart_reuses_duration() {
        let mut t = Countdown::new();
        t.start(100, 0);
        t.stop();
        t.restart(500);
        assert_eq!(t.remaining(500), 100);
    }

    #[test]
    fn start_near_clock_end_saturates() {
        let mut t = Countdown::new();
        t.start(100, u64::MAX - 10);
        assert!(t.is_running(u64::MAX - 1));
        assert!(t.expired(u64::MAX));
    }
}
