//! Deterministic candidate-slot scoring and ranking.
//!
//! Additive policy over a base of 100 points, considering time of day,
//! day of week, and meeting priority. Equal scores resolve to the
//! earlier start, so ranking is reproducible across runs.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::SchedulingError;
use crate::intersect::CandidateSlot;
use crate::meeting::Priority;

/// Base score every candidate slot starts from.
pub const BASE_SCORE: f64 = 100.0;

/// Time-of-day preference (+20 / +10 / 0).
///
/// Mid-morning and early afternoon score best:
/// - 10:00 or 11:00, 14:00 or 15:00 = +20
/// - otherwise 09:00-11:59 or 13:00-15:59 = +10
pub fn time_of_day_score(hour: u32) -> f64 {
    if matches!(hour, 10 | 11 | 14 | 15) {
        20.0
    } else if (9..12).contains(&hour) || (13..16).contains(&hour) {
        10.0
    } else {
        0.0
    }
}

/// Day-of-week preference (+15 / +5 / 0), Monday = 0.
///
/// - Tuesday-Thursday = +15
/// - Monday, Friday = +5
/// - weekend = 0
pub fn day_of_week_score(day: u32) -> f64 {
    if (1..=3).contains(&day) {
        15.0
    } else if day == 0 || day == 4 {
        5.0
    } else {
        0.0
    }
}

/// Priority adjustment.
///
/// - High: earlier in the week is better, (7 - day) * 5, plus +10 for
///   morning starts (hour <= 12)
/// - Low: later in the week is fine, day * 2, plus +5 for afternoon
///   starts (hour >= 14)
/// - Medium, Urgent: no adjustment
pub fn priority_adjustment(priority: Priority, day: u32, hour: u32) -> f64 {
    match priority {
        Priority::High => {
            let mut adjustment = (7 - day as i64) as f64 * 5.0;
            if hour <= 12 {
                adjustment += 10.0;
            }
            adjustment
        }
        Priority::Low => {
            let mut adjustment = day as f64 * 2.0;
            if hour >= 14 {
                adjustment += 5.0;
            }
            adjustment
        }
        Priority::Medium | Priority::Urgent => 0.0,
    }
}

/// Scores candidate slots and keeps the best few.
pub struct SlotScorer {
    work_start_hour: u32,
    work_end_hour: u32,
    max_suggestions: usize,
}

impl SlotScorer {
    pub fn new(work_start_hour: u32, work_end_hour: u32) -> Self {
        Self {
            work_start_hour,
            work_end_hour,
            max_suggestions: 3,
        }
    }

    /// Keep at most `max` suggestions after ranking.
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn work_hours(&self) -> (u32, u32) {
        (self.work_start_hour, self.work_end_hour)
    }

    /// Score a single slot start under the given priority.
    pub fn score(&self, slot_start: DateTime<Utc>, priority: Priority) -> f64 {
        let hour = slot_start.hour();
        let day = slot_start.weekday().num_days_from_monday();
        BASE_SCORE
            + time_of_day_score(hour)
            + day_of_week_score(day)
            + priority_adjustment(priority, day, hour)
    }

    /// Score, rank (score desc, start asc), and truncate candidates.
    ///
    /// # Errors
    /// `NoCandidateSlots` when the input list is empty; callers treat
    /// this as a legitimate "no common time" outcome, not a fault.
    pub fn rank(
        &self,
        mut slots: Vec<CandidateSlot>,
        priority: Priority,
    ) -> Result<Vec<CandidateSlot>, SchedulingError> {
        if slots.is_empty() {
            return Err(SchedulingError::NoCandidateSlots);
        }

        for slot in &mut slots {
            slot.score = self.score(slot.start, priority);
        }

        slots.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.start.cmp(&b.start))
        });
        slots.truncate(self.max_suggestions);
        Ok(slots)
    }
}
