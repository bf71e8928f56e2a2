//! The scheduling engine: the operations the core exposes.
//!
//! Wires access classification, availability aggregation, slot
//! intersection, scoring, and the proposal store behind three calls:
//! `schedule_meeting`, `confirm_proposal`, `get_proposal`. The engine
//! holds no background tasks; every call runs synchronously within the
//! caller's task, and many calls may run concurrently against the same
//! store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::access::classify_participants;
use crate::availability::AvailabilityAggregator;
use crate::config::EngineConfig;
use crate::error::{AccessError, Result, SchedulingError, StoreError};
use crate::gateway::{AuthDirectory, CalendarGateway, EmailMessage, EventDraft};
use crate::intersect::{CandidateSlot, SlotIntersector};
use crate::interval::Horizon;
use crate::meeting::{MeetingRequest, UserPreferences};
use crate::proposal::{Proposal, ProposalStatus};
use crate::scoring::SlotScorer;
use crate::store::ProposalStore;

/// Result of a scheduling call.
///
/// Finding no common time is a legitimate outcome of a successful call,
/// never a fault; no proposal is created in that case.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    /// A proposal with ranked candidate slots was created.
    Scheduled(Proposal),
    /// No window works for every authenticated participant.
    NoCommonAvailability { reason: String },
}

impl ScheduleOutcome {
    pub fn proposal(&self) -> Option<&Proposal> {
        match self {
            Self::Scheduled(p) => Some(p),
            Self::NoCommonAvailability { .. } => None,
        }
    }
}

/// A confirmed meeting: the provider event and the chosen window.
#[derive(Debug, Clone)]
pub struct ConfirmedMeeting {
    pub event_id: String,
    pub confirmed_slot: CandidateSlot,
}

/// The scheduling engine.
pub struct SchedulingEngine {
    gateway: Arc<dyn CalendarGateway>,
    directory: Arc<dyn AuthDirectory>,
    store: Arc<ProposalStore>,
    config: EngineConfig,
}

impl SchedulingEngine {
    /// Create an engine with a fresh store and default configuration.
    pub fn new(gateway: Arc<dyn CalendarGateway>, directory: Arc<dyn AuthDirectory>) -> Self {
        Self::with_parts(
            gateway,
            directory,
            Arc::new(ProposalStore::new()),
            EngineConfig::default(),
        )
    }

    /// Create an engine over an existing store and configuration.
    pub fn with_parts(
        gateway: Arc<dyn CalendarGateway>,
        directory: Arc<dyn AuthDirectory>,
        store: Arc<ProposalStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            directory,
            store,
            config,
        }
    }

    /// The store owning this engine's proposals.
    pub fn store(&self) -> &Arc<ProposalStore> {
        &self.store
    }

    /// Propose meeting times for a request over the given horizon.
    ///
    /// Validation failures reject the request before any gateway work.
    /// A gateway failure for one participant degrades that participant
    /// only; the call fails only when no accessible participant
    /// produced usable data.
    pub async fn schedule_meeting(
        &self,
        request: &MeetingRequest,
        preferences: &UserPreferences,
        horizon: Horizon,
    ) -> Result<ScheduleOutcome> {
        request.validate()?;
        preferences.validate()?;

        let requested = request.all_emails();
        let authenticated: HashSet<String> =
            self.directory.authenticated_participants().into_iter().collect();
        let report = classify_participants(&requested, &authenticated);
        debug!(
            accessible = report.accessible_participants.len(),
            denied = report.denied_participants.len(),
            "classified participants"
        );

        let aggregator = AvailabilityAggregator::new(Arc::clone(&self.gateway))
            .with_fetch_timeout(Duration::from_secs(self.config.fetch_timeout_secs));
        let availability = aggregator
            .collect(&requested, &report, &horizon, request.duration_minutes)
            .await?;

        let intersector =
            SlotIntersector::new(preferences.work_start_hour, preferences.work_end_hour);
        let slots = match intersector.find_common_slots(&availability, request.duration_minutes) {
            Ok(slots) => slots,
            Err(AccessError::NoAuthenticatedParticipants) => {
                return Ok(ScheduleOutcome::NoCommonAvailability {
                    reason: "Cannot suggest meeting times without access to participant \
                             calendars. Please ensure participants are authenticated."
                        .to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let total_found = slots.len();

        let scorer = SlotScorer::new(preferences.work_start_hour, preferences.work_end_hour)
            .with_max_suggestions(self.config.max_suggestions);
        let ranked = match scorer.rank(slots, request.priority) {
            Ok(ranked) => ranked,
            Err(SchedulingError::NoCandidateSlots) => {
                return Ok(ScheduleOutcome::NoCommonAvailability {
                    reason: format!(
                        "No common {}-minute window inside {}:00-{}:00 works for all \
                         authenticated participants.",
                        request.duration_minutes,
                        preferences.work_start_hour,
                        preferences.work_end_hour
                    ),
                });
            }
            Err(e) => return Err(e),
        };

        let authenticated_count = availability.iter().filter(|a| a.authenticated).count();
        let reasoning = build_reasoning(
            authenticated_count,
            total_found,
            ranked.len(),
            request,
            preferences,
        );

        // The proposal is inserted only after scoring fully completed,
        // so a cancelled call never leaves a half-written entry.
        let proposal = self
            .store
            .create(request.clone(), ranked, reasoning);
        info!(proposal_id = %proposal.id, slots = proposal.candidate_slots.len(), "proposal created");

        Ok(ScheduleOutcome::Scheduled(proposal))
    }

    /// Confirm one candidate slot, create the calendar event under the
    /// organizer's identity, and notify attendees.
    ///
    /// Preconditions are checked in order: the proposal exists, is
    /// PENDING, the index is in range, and the organizer is
    /// authenticated. The store transition is the serialization point
    /// for racing confirms; the event is created after it, and a
    /// notification failure is logged rather than escalated.
    pub async fn confirm_proposal(
        &self,
        proposal_id: &str,
        slot_index: usize,
    ) -> Result<ConfirmedMeeting> {
        let snapshot = self.store.get(proposal_id)?;

        match snapshot.status {
            ProposalStatus::Confirmed => {
                return Err(StoreError::AlreadyConfirmed {
                    id: proposal_id.to_string(),
                }
                .into())
            }
            ProposalStatus::Cancelled => {
                return Err(StoreError::ProposalCancelled {
                    id: proposal_id.to_string(),
                }
                .into())
            }
            ProposalStatus::Pending => {}
        }
        if slot_index >= snapshot.candidate_slots.len() {
            return Err(StoreError::InvalidSlotIndex {
                index: slot_index,
                len: snapshot.candidate_slots.len(),
            }
            .into());
        }

        let organizer = &snapshot.meeting_request.organizer.email;
        if !self.directory.is_authenticated(organizer) {
            return Err(AccessError::OrganizerNotAuthenticated {
                participant_id: organizer.clone(),
            }
            .into());
        }

        // Authoritative transition; a racing confirm loses here with
        // AlreadyConfirmed and triggers no gateway work.
        let confirmed = self.store.confirm(proposal_id, slot_index)?;
        let slot = confirmed.candidate_slots[slot_index].clone();

        let request = &confirmed.meeting_request;
        let attendees = request.all_emails();
        let event = EventDraft {
            title: request.title.clone(),
            description: request.description.clone(),
            start: slot.start,
            end: slot.end,
            attendees: attendees.clone(),
            location: None,
        };
        let event_id = self.gateway.create_event(&event, organizer).await?;
        info!(proposal_id, event_id = %event_id, "meeting confirmed");

        let message = EmailMessage {
            to: attendees.clone(),
            subject: format!("Meeting Confirmed: {}", request.title),
            body: format!(
                "Your meeting '{}' has been confirmed for {}.\n\nOrganizer: {}\nAttendees: {} total",
                request.title,
                slot.format_label(),
                request.organizer.name,
                attendees.len()
            ),
        };
        if let Err(e) = self.gateway.send_email(&message, organizer).await {
            warn!(proposal_id, error = %e, "confirmation email failed");
        }

        Ok(ConfirmedMeeting {
            event_id,
            confirmed_slot: slot,
        })
    }

    /// Read-only projection of a proposal.
    pub fn get_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        Ok(self.store.get(proposal_id)?)
    }
}

/// Summary of how a proposal's suggestions were selected.
fn build_reasoning(
    authenticated_count: usize,
    total_found: usize,
    kept: usize,
    request: &MeetingRequest,
    preferences: &UserPreferences,
) -> String {
    format!(
        "Analyzed availability for {} authenticated participants.\n\
         Found {} potential time slots.\n\
         Prioritized based on:\n\
         - Meeting priority: {}\n\
         - Work hours: {}:00 - {}:00\n\
         - Buffer time: {} minutes\n\
         - Participant preferences\n\
         \n\
         Top {} recommendations selected.",
        authenticated_count,
        total_found,
        request.priority.as_str(),
        preferences.work_start_hour,
        preferences.work_end_hour,
        preferences.buffer_time_minutes,
        kept
    )
}
