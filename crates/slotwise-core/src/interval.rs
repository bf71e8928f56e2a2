//! Free-interval derivation from busy calendar records.
//!
//! Converts one participant's busy intervals into the free windows of a
//! query horizon. Busy input may be unsorted, overlap, abut, or extend
//! past the horizon; output is sorted, disjoint, and together with the
//! clamped busy set tiles the horizon exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub available: bool,
}

impl TimeInterval {
    /// Create an interval, returning an error unless `start < end`.
    pub fn try_new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        available: bool,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            available,
        })
    }

    /// A busy (occupied) interval.
    ///
    /// # Panics
    /// Panics if `end <= start`. Use [`try_new`](Self::try_new) for a
    /// non-panicking version.
    pub fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::try_new(start, end, false).expect("TimeInterval::busy: end must be after start")
    }

    /// A free (unoccupied) interval.
    ///
    /// # Panics
    /// Panics if `end <= start`. Use [`try_new`](Self::try_new) for a
    /// non-panicking version.
    pub fn free(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::try_new(start, end, true).expect("TimeInterval::free: end must be after start")
    }

    /// Get duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this interval fully contains `[start, end)`.
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && self.end >= end
    }

    /// Check if this interval overlaps another.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// The `[start, end)` window over which availability is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Horizon {
    /// Create a horizon, returning an error unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Clamp an interval to this horizon. Returns `None` when nothing
    /// of it remains (fully outside, or zero-length after clamping).
    pub fn clamp(&self, interval: &TimeInterval) -> Option<TimeInterval> {
        let start = interval.start.max(self.start);
        let end = interval.end.min(self.end);
        if start >= end {
            return None;
        }
        Some(TimeInterval {
            start,
            end,
            available: interval.available,
        })
    }
}

/// Derives free intervals from busy intervals within a horizon.
///
/// The sweep merges overlapping and adjacent busy records without
/// double-counting, so the output is disjoint and sorted by start.
pub struct FreeIntervalCalculator {
    /// Minimum free-interval duration to keep (in minutes)
    min_duration_minutes: i64,
}

impl FreeIntervalCalculator {
    /// Create a calculator that keeps every free interval.
    pub fn new() -> Self {
        Self {
            min_duration_minutes: 0,
        }
    }

    /// Discard free intervals shorter than `minutes`.
    pub fn with_min_duration(mut self, minutes: i64) -> Self {
        self.min_duration_minutes = minutes;
        self
    }

    /// Compute the free intervals of `horizon` not covered by `busy`.
    ///
    /// # Arguments
    /// * `busy` - Busy intervals, in any order; clamped to the horizon
    /// * `horizon` - The query window
    ///
    /// # Returns
    /// Free intervals sorted by start time. Empty busy input yields a
    /// single interval spanning the whole horizon.
    pub fn free_intervals(&self, busy: &[TimeInterval], horizon: &Horizon) -> Vec<TimeInterval> {
        let mut clamped: Vec<TimeInterval> =
            busy.iter().filter_map(|b| horizon.clamp(b)).collect();
        clamped.sort_by_key(|b| b.start);

        let mut free = Vec::new();
        let mut cursor = horizon.start();

        for b in &clamped {
            if cursor < b.start {
                self.push_free(&mut free, cursor, b.start);
            }
            // Overlapping/adjacent busy records never move the cursor back.
            if b.end > cursor {
                cursor = b.end;
            }
        }

        if cursor < horizon.end() {
            self.push_free(&mut free, cursor, horizon.end());
        }

        free
    }

    fn push_free(&self, out: &mut Vec<TimeInterval>, start: DateTime<Utc>, end: DateTime<Utc>) {
        let interval = TimeInterval {
            start,
            end,
            available: true,
        };
        if interval.duration_minutes() >= self.min_duration_minutes {
            out.push(interval);
        }
    }
}

impl Default for FreeIntervalCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to compute free intervals with no minimum.
pub fn free_intervals(busy: &[TimeInterval], horizon: &Horizon) -> Vec<TimeInterval> {
    FreeIntervalCalculator::new().free_intervals(busy, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        // March 2026: the 2nd is a Monday
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn horizon_rejects_malformed_range() {
        let err = Horizon::new(at(2, 12, 0), at(2, 9, 0));
        assert!(matches!(
            err,
            Err(ValidationError::InvalidRange { .. })
        ));
        assert!(Horizon::new(at(2, 9, 0), at(2, 9, 0)).is_err());
    }

    #[test]
    fn empty_busy_yields_whole_horizon() {
        let horizon = Horizon::new(at(2, 0, 0), at(2, 23, 59)).unwrap();
        let free = free_intervals(&[], &horizon);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].start, horizon.start());
        assert_eq!(free[0].end, horizon.end());
        assert!(free[0].available);
    }

    #[test]
    fn single_busy_interval_splits_horizon() {
        // Monday 00:00-23:59 with one busy hour 10:00-11:00
        let horizon = Horizon::new(at(2, 0, 0), at(2, 23, 59)).unwrap();
        let busy = vec![TimeInterval::busy(at(2, 10, 0), at(2, 11, 0))];

        let free = free_intervals(&busy, &horizon);
        assert_eq!(free.len(), 2);
        assert_eq!((free[0].start, free[0].end), (at(2, 0, 0), at(2, 10, 0)));
        assert_eq!((free[1].start, free[1].end), (at(2, 11, 0), at(2, 23, 59)));
    }

    #[test]
    fn overlapping_busy_intervals_merge() {
        let horizon = Horizon::new(at(2, 8, 0), at(2, 18, 0)).unwrap();
        let busy = vec![
            TimeInterval::busy(at(2, 9, 0), at(2, 11, 0)),
            TimeInterval::busy(at(2, 10, 0), at(2, 12, 0)),
            TimeInterval::busy(at(2, 12, 0), at(2, 13, 0)), // adjacent
        ];

        let free = free_intervals(&busy, &horizon);
        assert_eq!(free.len(), 2);
        assert_eq!((free[0].start, free[0].end), (at(2, 8, 0), at(2, 9, 0)));
        assert_eq!((free[1].start, free[1].end), (at(2, 13, 0), at(2, 18, 0)));
    }

    #[test]
    fn busy_outside_horizon_is_clamped() {
        let horizon = Horizon::new(at(2, 9, 0), at(2, 17, 0)).unwrap();
        let busy = vec![
            TimeInterval::busy(at(2, 6, 0), at(2, 10, 0)),  // straddles start
            TimeInterval::busy(at(2, 16, 0), at(2, 20, 0)), // straddles end
            TimeInterval::busy(at(3, 9, 0), at(3, 10, 0)),  // next day, dropped
        ];

        let free = free_intervals(&busy, &horizon);
        assert_eq!(free.len(), 1);
        assert_eq!((free[0].start, free[0].end), (at(2, 10, 0), at(2, 16, 0)));
    }

    #[test]
    fn min_duration_filters_short_windows() {
        let horizon = Horizon::new(at(2, 9, 0), at(2, 12, 0)).unwrap();
        let busy = vec![TimeInterval::busy(at(2, 9, 20), at(2, 11, 0))];

        let calc = FreeIntervalCalculator::new().with_min_duration(30);
        let free = calc.free_intervals(&busy, &horizon);
        // 09:00-09:20 is dropped, 11:00-12:00 survives
        assert_eq!(free.len(), 1);
        assert_eq!((free[0].start, free[0].end), (at(2, 11, 0), at(2, 12, 0)));
    }

    #[test]
    fn fully_busy_horizon_has_no_free_time() {
        let horizon = Horizon::new(at(2, 9, 0), at(2, 17, 0)).unwrap();
        let busy = vec![TimeInterval::busy(at(2, 8, 0), at(2, 18, 0))];
        assert!(free_intervals(&busy, &horizon).is_empty());
    }

    // Strategy: up to 12 arbitrary busy intervals inside a two-day window,
    // minute-aligned, any order, overlaps allowed.
    fn busy_set() -> impl Strategy<Value = Vec<(i64, i64)>> {
        prop::collection::vec(
            (0i64..2880, 1i64..600).prop_map(|(start, len)| (start, start + len)),
            0..12,
        )
    }

    proptest! {
        /// Free output plus clamped busy input tiles the horizon: sorted,
        /// disjoint, and gap-free once busy intervals are merged in.
        #[test]
        fn free_and_busy_tile_the_horizon(busy in busy_set()) {
            let base = at(2, 0, 0);
            let horizon = Horizon::new(base, base + chrono::Duration::minutes(2880)).unwrap();
            let busy: Vec<TimeInterval> = busy
                .iter()
                .map(|&(s, e)| TimeInterval::busy(
                    base + chrono::Duration::minutes(s),
                    base + chrono::Duration::minutes(e),
                ))
                .collect();

            let free = free_intervals(&busy, &horizon);

            // Free intervals are sorted, non-empty, and inside the horizon.
            for w in free.windows(2) {
                prop_assert!(w[0].end <= w[1].start);
            }
            for f in &free {
                prop_assert!(f.start < f.end);
                prop_assert!(f.start >= horizon.start() && f.end <= horizon.end());
                // No free minute may fall inside any busy interval.
                for b in &busy {
                    prop_assert!(!(f.start < b.end && f.end > b.start));
                }
            }

            // Total coverage: free minutes + merged busy minutes == horizon.
            let mut covered: Vec<(DateTime<Utc>, DateTime<Utc>)> = free
                .iter()
                .map(|f| (f.start, f.end))
                .chain(busy.iter().filter_map(|b| {
                    horizon.clamp(b).map(|c| (c.start, c.end))
                }))
                .collect();
            covered.sort();
            let mut cursor = horizon.start();
            for (s, e) in covered {
                prop_assert!(s <= cursor, "gap before {s}");
                if e > cursor {
                    cursor = e;
                }
            }
            prop_assert_eq!(cursor, horizon.end());
        }

        /// Input order never changes the output.
        #[test]
        fn deterministic_under_permutation(busy in busy_set()) {
            let base = at(2, 0, 0);
            let horizon = Horizon::new(base, base + chrono::Duration::minutes(2880)).unwrap();
            let intervals: Vec<TimeInterval> = busy
                .iter()
                .map(|&(s, e)| TimeInterval::busy(
                    base + chrono::Duration::minutes(s),
                    base + chrono::Duration::minutes(e),
                ))
                .collect();

            let mut reversed = intervals.clone();
            reversed.reverse();

            prop_assert_eq!(
                free_intervals(&intervals, &horizon),
                free_intervals(&reversed, &horizon)
            );
        }
    }
}
