//=========================================================================
// Spam
//=========================================================================
//
// Cancellable fixed-interval repeating task driven by a virtual clock.
//
// Architecture:
//   start(now, stop_after) → Running { anchor, deadline }
//   poll(now)              → number of fires due since the last poll
//   stop()                 → Idle (idempotent)
//
// A spam never calls anything itself. The owner polls it once per tick
// and performs one unit of work per reported fire, which keeps every
// fire inside the single-threaded logic tick.
//
//=========================================================================

use std::time::Duration;

use log::warn;

//=== Constants ===========================================================

/// Shortest accepted interval. Shorter requests are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Upper bound of fires reported by one poll after a long stall.
const MAX_FIRES_PER_POLL: u32 = 4096;

//=== SpamState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpamState {
    Idle,
    Running {
        /// Time of the last fire (or of the start).
        anchor: Duration,
        /// Automatic stop time, if the spam was started with a duration.
        deadline: Option<Duration>,
    },
}

//=== Spam ================================================================

/// Fixed-interval repeating task with an optional automatic stop.
///
/// ```
/// use std::time::Duration;
/// use scrollstage_engine::core::spam::Spam;
///
/// let mut spam = Spam::new(Duration::from_millis(2));
/// spam.start(Duration::ZERO, Some(Duration::from_millis(5)));
///
/// assert_eq!(spam.poll(Duration::from_millis(4)), 2);
/// assert_eq!(spam.poll(Duration::from_millis(10)), 0);
/// assert!(!spam.is_running());
/// ```
#[derive(Debug, Clone)]
pub struct Spam {
    interval: Duration,
    state: SpamState,
}

impl Spam {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            state: SpamState::Idle,
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Starts repeating from `now`.
    ///
    /// With `stop_after`, the spam stops by itself once that much time
    /// has passed. Returns `false` and changes nothing when already
    /// running.
    pub fn start(&mut self, now: Duration, stop_after: Option<Duration>) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SpamState::Running {
            anchor: now,
            deadline: stop_after.map(|d| now + d),
        };
        true
    }

    /// Stops the spam. Stopping an idle spam does nothing.
    pub fn stop(&mut self) {
        self.state = SpamState::Idle;
    }

    /// Changes the interval. A running spam keeps its deadline and
    /// schedules its next fire one new interval after the last one.
    pub fn update_interval(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_INTERVAL);
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_running(&self) -> bool {
        matches!(self.state, SpamState::Running { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Automatic stop time of the current run.
    pub fn deadline(&self) -> Option<Duration> {
        match self.state {
            SpamState::Running { deadline, .. } => deadline,
            SpamState::Idle => None,
        }
    }

    //--- Ticking ----------------------------------------------------------

    /// Returns how many fires are due up to `now` and advances past them.
    ///
    /// Fires scheduled exactly at the deadline still count. Once the
    /// deadline is reached the spam goes idle.
    pub fn poll(&mut self, now: Duration) -> u32 {
        let SpamState::Running { mut anchor, deadline } = self.state else {
            return 0;
        };

        let limit = deadline.map_or(now, |d| d.min(now));
        let mut fires = 0;

        while anchor + self.interval <= limit {
            anchor += self.interval;
            fires += 1;

            if fires == MAX_FIRES_PER_POLL {
                warn!(target: "spam", "Spam fell behind, skipping to {:?}", limit);
                anchor = limit;
                break;
            }
        }

        self.state = match deadline {
            Some(d) if d <= now => SpamState::Idle,
            _ => SpamState::Running { anchor, deadline },
        };

        fires
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn idle_spam_never_fires() {
        let mut spam = Spam::new(ms(2));
        assert_eq!(spam.poll(ms(100)), 0);
        assert!(!spam.is_running());
    }

    #[test]
    fn fires_once_per_interval() {
        let mut spam = Spam::new(ms(2));
        spam.start(ms(0), None);
        assert_eq!(spam.poll(ms(1)), 0);
        assert_eq!(spam.poll(ms(2)), 1);
        assert_eq!(spam.poll(ms(9)), 3);
        assert!(spam.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut spam = Spam::new(ms(2));
        spam.stop();
        assert!(!spam.is_running());

        spam.start(ms(0), None);
        spam.stop();
        spam.stop();
        assert!(!spam.is_running());
        assert_eq!(spam.poll(ms(50)), 0);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let mut spam = Spam::new(ms(2));
        assert!(spam.start(ms(0), None));
        assert!(!spam.start(ms(1), Some(ms(1))));
        assert_eq!(spam.deadline(), None);
    }

    #[test]
    fn deadline_stops_automatically() {
        let mut spam = Spam::new(ms(3));
        spam.start(ms(0), Some(ms(9)));
        assert_eq!(spam.poll(ms(100)), 3);
        assert!(!spam.is_running());
    }

    #[test]
    fn stop_after_deadline_is_still_safe() {
        let mut spam = Spam::new(ms(1));
        spam.start(ms(0), Some(ms(2)));
        spam.poll(ms(5));
        spam.stop();
        assert!(!spam.is_running());
    }

    #[test]
    fn update_interval_keeps_running() {
        let mut spam = Spam::new(ms(2));
        spam.start(ms(0), None);
        assert_eq!(spam.poll(ms(4)), 2);
        spam.update_interval(ms(5));
        assert!(spam.is_running());
        assert_eq!(spam.poll(ms(8)), 0);
        assert_eq!(spam.poll(ms(9)), 1);
    }

    #[test]
    fn zero_interval_is_raised_to_minimum() {
        let spam = Spam::new(Duration::ZERO);
        assert_eq!(spam.interval(), MIN_INTERVAL);
    }

    #[test]
    fn long_stall_is_bounded() {
        let mut spam = Spam::new(ms(1));
        spam.start(ms(0), None);
        assert_eq!(spam.poll(Duration::from_secs(3600)), MAX_FIRES_PER_POLL);
        assert_eq!(spam.poll(Duration::from_secs(3600)), 0);
    }
}
