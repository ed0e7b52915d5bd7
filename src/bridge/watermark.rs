//! Poll window bookkeeping
//!
//! The watermark is the exclusive lower bound of the next poll window. It is
//! owned by one poller and touched only inside a cycle, so no synchronization
//! is needed. It never moves backward; a failed query leaves it untouched so
//! the same window (grown by one interval) is retried on the next cycle.

use chrono::{DateTime, Duration, Utc};

/// Half-open time range `[start, end)` queried in one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PollWindow {
    /// True when the sampled end precedes the start (clock went backwards).
    /// Treated as an empty window, never an error.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Exclusive timestamp boundary marking events already processed.
#[derive(Debug, Clone)]
pub struct Watermark {
    last_check: DateTime<Utc>,
}

impl Watermark {
    /// Start `lookback_secs` behind `now` to catch events emitted in the
    /// seconds before the process became ready.
    pub fn new(now: DateTime<Utc>, lookback_secs: u64) -> Self {
        Self {
            last_check: now - Duration::seconds(lookback_secs as i64),
        }
    }

    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    /// Window for the next query. `now` must be sampled once per cycle and
    /// reused for the fallback advance.
    pub fn current_window(&self, now: DateTime<Utc>) -> PollWindow {
        PollWindow {
            start: self.last_check,
            end: now,
        }
    }

    /// Advance after a successful query.
    ///
    /// If an event strictly newer than the watermark was seen, move just past
    /// it (1 ms) so the next window excludes it. Otherwise fall back to the
    /// window end so a quiet source does not grow the window unbounded.
    /// Never moves backward.
    pub fn advance(&mut self, latest_seen: Option<DateTime<Utc>>, window_end: DateTime<Utc>) {
        let next = match latest_seen {
            Some(ts) if ts > self.last_check => ts + Duration::milliseconds(1),
            _ => window_end,
        };
        if next > self.last_check {
            self.last_check = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000).unwrap()
    }

    #[test]
    fn initializes_behind_startup_time() {
        let now = at(1_000, 0);
        let wm = Watermark::new(now, 15);
        assert_eq!(wm.last_check(), at(985, 0));
    }

    #[test]
    fn window_spans_last_check_to_now() {
        let wm = Watermark::new(at(1_000, 0), 15);
        let window = wm.current_window(at(1_005, 0));
        assert_eq!(window.start, at(985, 0));
        assert_eq!(window.end, at(1_005, 0));
        assert!(!window.is_inverted());
    }

    #[test]
    fn advance_moves_one_millisecond_past_latest_event() {
        let mut wm = Watermark::new(at(1_000, 0), 0);
        wm.advance(Some(at(1_002, 500)), at(1_005, 0));
        assert_eq!(wm.last_check(), at(1_002, 501));
    }

    #[test]
    fn advance_without_events_moves_to_window_end() {
        let mut wm = Watermark::new(at(1_000, 0), 0);
        wm.advance(None, at(1_005, 0));
        assert_eq!(wm.last_check(), at(1_005, 0));
    }

    #[test]
    fn stale_events_fall_back_to_window_end() {
        // An event at or before the watermark (inclusive-boundary duplicate)
        // must not pull the watermark backward.
        let mut wm = Watermark::new(at(1_000, 0), 0);
        wm.advance(Some(at(999, 0)), at(1_005, 0));
        assert_eq!(wm.last_check(), at(1_005, 0));
    }

    #[test]
    fn never_moves_backward() {
        let mut wm = Watermark::new(at(1_000, 0), 0);
        wm.advance(None, at(990, 0));
        assert_eq!(wm.last_check(), at(1_000, 0));
    }

    #[test]
    fn monotonic_across_cycles() {
        let mut wm = Watermark::new(at(1_000, 0), 15);
        let mut previous = wm.last_check();
        let cycles: [(Option<DateTime<Utc>>, DateTime<Utc>); 4] = [
            (None, at(1_005, 0)),
            (Some(at(1_007, 250)), at(1_010, 0)),
            (Some(at(1_006, 0)), at(1_015, 0)),
            (None, at(1_020, 0)),
        ];
        for (latest, end) in cycles {
            wm.advance(latest, end);
            assert!(wm.last_check() >= previous);
            previous = wm.last_check();
        }
    }
}
