//! Repeating frame-advance timer
//!
//! The host loop has no callbacks of its own; it asks the timer whether a
//! tick is due. Restarting replaces the pending deadline, so a timer can
//! never have two deadlines outstanding.

use std::time::{Duration, Instant};

/// Repeating timer driven by explicit `poll` calls.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval: Duration,
    /// Next firing time; `None` while stopped
    deadline: Option<Instant>,
}

impl FrameTimer {
    /// Create a stopped timer with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// (Re)start the timer. Any pending deadline is discarded.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Restart the timer with a new interval.
    pub fn restart_with(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.start(now);
    }

    /// Change the interval without touching the running state.
    ///
    /// A stopped timer stays stopped; a running one is restarted.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        if self.is_active() {
            self.restart_with(interval, now);
        } else {
            self.interval = interval;
        }
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the timer fired since the last poll.
    ///
    /// Fires at most once per call. Missed ticks coalesce: when the host fell
    /// more than one interval behind, the next deadline is measured from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let mut next = deadline + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.deadline = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(10));
        assert!(!timer.is_active());
        assert!(!timer.poll(t0 + ms(1000)));
    }

    #[test]
    fn test_fires_on_interval() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(100));
        timer.start(t0);

        assert!(!timer.poll(t0 + ms(99)));
        assert!(timer.poll(t0 + ms(100)));
        assert!(!timer.poll(t0 + ms(150)));
        assert!(timer.poll(t0 + ms(200)));
    }

    #[test]
    fn test_missed_ticks_coalesce() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(100));
        timer.start(t0);

        // Host stalled for 5 intervals: only one tick is reported
        assert!(timer.poll(t0 + ms(550)));
        assert!(!timer.poll(t0 + ms(600)));
        assert_eq!(timer.deadline(), Some(t0 + ms(650)));
    }

    #[test]
    fn test_restart_replaces_deadline() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(20));
        timer.start(t0);
        timer.restart_with(ms(500), t0 + ms(5));

        // Old 20ms deadline must be gone
        assert!(!timer.poll(t0 + ms(25)));
        assert!(!timer.poll(t0 + ms(504)));
        assert!(timer.poll(t0 + ms(505)));
    }

    #[test]
    fn test_set_interval_keeps_stopped() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(20));
        timer.set_interval(ms(50), t0);
        assert!(!timer.is_active());
        assert_eq!(timer.interval(), ms(50));

        timer.start(t0);
        assert_eq!(timer.deadline(), Some(t0 + ms(50)));
    }

    #[test]
    fn test_stop_cancels() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(ms(10));
        timer.start(t0);
        timer.stop();
        assert!(!timer.poll(t0 + ms(100)));
        assert_eq!(timer.deadline(), None);
    }
}
