//! Meeting proposals and their confirmation state machine.
//!
//! State transitions:
//! - PENDING → CONFIRMED (one slot selected)
//! - PENDING → CANCELLED (reserved for cancellation flows)
//! - CONFIRMED, CANCELLED: terminal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intersect::CandidateSlot;
use crate::meeting::MeetingRequest;

/// Lifecycle state of a proposal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalStatus {
    /// Awaiting confirmation (initial state)
    Pending,
    /// One candidate slot was confirmed (terminal)
    Confirmed,
    /// Cancelled before confirmation (terminal)
    Cancelled,
}

impl ProposalStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &ProposalStatus) -> bool {
        match self {
            ProposalStatus::Pending => {
                matches!(to, ProposalStatus::Confirmed | ProposalStatus::Cancelled)
            }
            ProposalStatus::Confirmed => false,
            ProposalStatus::Cancelled => false,
        }
    }

    /// Get valid next states for this state.
    pub fn valid_transitions(&self) -> &[ProposalStatus] {
        match self {
            ProposalStatus::Pending => &[ProposalStatus::Confirmed, ProposalStatus::Cancelled],
            ProposalStatus::Confirmed => &[],
            ProposalStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

impl Default for ProposalStatus {
    fn default() -> Self {
        ProposalStatus::Pending
    }
}

/// The record of a scheduling request: its ranked candidate slots,
/// reasoning, and confirmation state.
///
/// `confirmed_slot_index` is set iff `status` is CONFIRMED, and never
/// changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub meeting_request: MeetingRequest,
    /// Sorted by (score desc, start asc).
    pub candidate_slots: Vec<CandidateSlot>,
    pub reasoning: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub confirmed_slot_index: Option<usize>,
}

impl Proposal {
    /// Create a fresh PENDING proposal.
    pub fn new(
        meeting_request: MeetingRequest,
        candidate_slots: Vec<CandidateSlot>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            meeting_request,
            candidate_slots,
            reasoning: reasoning.into(),
            status: ProposalStatus::Pending,
            created_at: Utc::now(),
            confirmed_slot_index: None,
        }
    }

    /// The confirmed slot, when one was selected.
    pub fn confirmed_slot(&self) -> Option<&CandidateSlot> {
        self.confirmed_slot_index
            .and_then(|index| self.candidate_slots.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::{Participant, Priority};

    fn make_request() -> MeetingRequest {
        MeetingRequest {
            title: "Standup".to_string(),
            description: String::new(),
            duration_minutes: 15,
            organizer: Participant::new("Alice", "alice@example.com"),
            participants: Vec::new(),
            priority: Priority::Medium,
            preferred_days: Vec::new(),
            buffer_time_minutes: 15,
        }
    }

    #[test]
    fn pending_may_confirm_or_cancel() {
        let pending = ProposalStatus::Pending;
        assert!(pending.can_transition_to(&ProposalStatus::Confirmed));
        assert!(pending.can_transition_to(&ProposalStatus::Cancelled));
        assert!(!pending.can_transition_to(&ProposalStatus::Pending));
        assert!(!pending.is_terminal());
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for terminal in [ProposalStatus::Confirmed, ProposalStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.valid_transitions().is_empty());
            assert!(!terminal.can_transition_to(&ProposalStatus::Pending));
            assert!(!terminal.can_transition_to(&ProposalStatus::Confirmed));
        }
    }

    #[test]
    fn new_proposals_start_pending_with_unique_ids() {
        let a = Proposal::new(make_request(), Vec::new(), "reasoning");
        let b = Proposal::new(make_request(), Vec::new(), "reasoning");
        assert_eq!(a.status, ProposalStatus::Pending);
        assert!(a.confirmed_slot_index.is_none());
        assert!(a.confirmed_slot().is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&ProposalStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let back: ProposalStatus = serde_json::from_str("\"CONFIRMED\"").unwrap();
        assert_eq!(back, ProposalStatus::Confirmed);
    }
}
