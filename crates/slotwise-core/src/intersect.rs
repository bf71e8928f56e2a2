//! Cross-participant slot intersection.
//!
//! Finds candidate windows of exactly the requested duration that every
//! authenticated participant can attend, inside the work-hour window.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::ParticipantAvailability;
use crate::error::AccessError;

/// A proposed meeting window of exactly the requested duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Set by the scorer; intersection leaves it at zero.
    #[serde(default)]
    pub score: f64,
    pub day_of_week: String,
}

impl CandidateSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            score: 0.0,
            day_of_week: start.format("%A").to_string(),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Weekday index, Monday = 0 ... Sunday = 6.
    pub fn weekday_index(&self) -> u32 {
        self.start.weekday().num_days_from_monday()
    }

    /// Human-readable label ("Monday, March 02 at 10:00 AM - 10:30 AM").
    pub fn format_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%A, %B %d at %I:%M %p"),
            self.end.format("%I:%M %p")
        )
    }
}

/// Finds slots common to all authenticated participants.
pub struct SlotIntersector {
    work_start_hour: u32,
    work_end_hour: u32,
}

impl SlotIntersector {
    pub fn new(work_start_hour: u32, work_end_hour: u32) -> Self {
        Self {
            work_start_hour,
            work_end_hour,
        }
    }

    /// Intersect free intervals into candidate slots of `duration_minutes`.
    ///
    /// The first authenticated participant with a qualifying free
    /// interval drives slot generation: each of their long-enough free
    /// intervals is walked in duration-sized steps from its start, each
    /// step proposing one exact-duration slot. A slot survives only if
    /// it sits inside work hours and every other authenticated
    /// participant has a free interval fully containing it -- partial
    /// overlap does not qualify.
    ///
    /// # Errors
    /// `NoAuthenticatedParticipants` when nobody has queryable
    /// availability with at least one qualifying interval.
    pub fn find_common_slots(
        &self,
        availability: &[ParticipantAvailability],
        duration_minutes: i64,
    ) -> Result<Vec<CandidateSlot>, AccessError> {
        let restricted: Vec<&ParticipantAvailability> = availability
            .iter()
            .filter(|a| a.authenticated && !a.free_intervals.is_empty())
            .collect();

        let Some((driver, others)) = restricted.split_first() else {
            return Err(AccessError::NoAuthenticatedParticipants);
        };

        let duration = Duration::minutes(duration_minutes);
        let mut slots = Vec::new();

        for interval in &driver.free_intervals {
            if interval.duration_minutes() < duration_minutes {
                continue;
            }

            let mut slot_start = interval.start;
            while slot_start + duration <= interval.end {
                let slot_end = slot_start + duration;

                let in_work_hours = slot_start.hour() >= self.work_start_hour
                    && slot_end.hour() <= self.work_end_hour;
                let works_for_all = in_work_hours
                    && others.iter().all(|participant| {
                        participant
                            .free_intervals
                            .iter()
                            .any(|j| j.contains(slot_start, slot_end))
                    });

                if works_for_all {
                    slots.push(CandidateSlot::new(slot_start, slot_end));
                }

                slot_start += duration;
            }
        }

        slots.sort_by_key(|s| s.start);
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::TimeInterval;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn participant(id: &str, free: Vec<TimeInterval>) -> ParticipantAvailability {
        ParticipantAvailability {
            participant_id: id.to_string(),
            authenticated: true,
            free_intervals: free,
            busy_intervals: Vec::new(),
        }
    }

    fn denied(id: &str) -> ParticipantAvailability {
        ParticipantAvailability {
            participant_id: id.to_string(),
            authenticated: false,
            free_intervals: Vec::new(),
            busy_intervals: Vec::new(),
        }
    }

    #[test]
    fn no_authenticated_participants_is_an_error() {
        let intersector = SlotIntersector::new(9, 17);
        let err = intersector.find_common_slots(&[denied("a@x.com")], 30);
        assert!(matches!(err, Err(AccessError::NoAuthenticatedParticipants)));
    }

    #[test]
    fn driver_slots_must_be_contained_by_everyone() {
        // A free 09:00-12:00; B free 10:00-11:30. Only slots starting
        // at 10:00, 10:30, and 11:00 work for both.
        let a = participant("a@x.com", vec![TimeInterval::free(at(9, 0), at(12, 0))]);
        let b = participant("b@x.com", vec![TimeInterval::free(at(10, 0), at(11, 30))]);

        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector.find_common_slots(&[a, b], 30).unwrap();

        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![at(10, 0), at(10, 30), at(11, 0)]);
        for slot in &slots {
            assert_eq!(slot.duration_minutes(), 30);
            assert_eq!(slot.end - slot.start, Duration::minutes(30));
        }
    }

    #[test]
    fn partial_overlap_does_not_qualify() {
        // B's window straddles each of A's proposed slots without
        // containing any of them.
        let a = participant("a@x.com", vec![TimeInterval::free(at(10, 0), at(11, 0))]);
        let b = participant("b@x.com", vec![TimeInterval::free(at(10, 15), at(10, 45))]);

        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector.find_common_slots(&[a, b], 30).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn slots_outside_work_hours_are_rejected() {
        let a = participant(
            "a@x.com",
            vec![
                TimeInterval::free(at(7, 0), at(8, 0)),   // before work
                TimeInterval::free(at(10, 0), at(11, 0)), // inside
                TimeInterval::free(at(18, 0), at(19, 0)), // after work
            ],
        );

        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector.find_common_slots(&[a], 30).unwrap();
        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![at(10, 0), at(10, 30)]);
    }

    #[test]
    fn short_driver_intervals_propose_nothing() {
        let a = participant("a@x.com", vec![TimeInterval::free(at(10, 0), at(10, 20))]);
        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector.find_common_slots(&[a], 30).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn denied_participants_never_block() {
        let a = participant("a@x.com", vec![TimeInterval::free(at(10, 0), at(11, 0))]);
        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector
            .find_common_slots(&[a, denied("eve@external.org")], 30)
            .unwrap();
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn every_slot_is_contained_in_each_participants_free_time() {
        let a = participant(
            "a@x.com",
            vec![
                TimeInterval::free(at(9, 0), at(10, 30)),
                TimeInterval::free(at(13, 0), at(15, 0)),
            ],
        );
        let b = participant(
            "b@x.com",
            vec![
                TimeInterval::free(at(9, 0), at(9, 45)),
                TimeInterval::free(at(13, 30), at(16, 0)),
            ],
        );

        let intersector = SlotIntersector::new(9, 17);
        let slots = intersector
            .find_common_slots(&[a.clone(), b.clone()], 45)
            .unwrap();

        assert!(!slots.is_empty());
        for slot in &slots {
            for p in [&a, &b] {
                assert!(
                    p.free_intervals
                        .iter()
                        .any(|j| j.contains(slot.start, slot.end)),
                    "slot {} not contained for {}",
                    slot.start,
                    p.participant_id
                );
            }
        }
    }

    #[test]
    fn slot_labels_name_the_weekday() {
        let slot = CandidateSlot::new(at(10, 0), at(10, 30));
        assert_eq!(slot.day_of_week, "Monday");
        assert_eq!(slot.weekday_index(), 0);
        assert!(slot.format_label().contains("Monday, March 02 at 10:00 AM"));
    }
}
