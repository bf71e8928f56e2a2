//! In-memory proposal store.
//!
//! Owns every Proposal instance; callers only ever receive clones.
//! Reads run concurrently; the confirm transition is serialized per
//! proposal id through that entry's own lock, so racing confirms on
//! one id resolve to exactly one winner while unrelated ids proceed
//! untouched.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::intersect::CandidateSlot;
use crate::meeting::MeetingRequest;
use crate::proposal::{Proposal, ProposalStatus};

/// Store of proposals keyed by id.
#[derive(Default)]
pub struct ProposalStore {
    proposals: RwLock<HashMap<String, Arc<RwLock<Proposal>>>>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously exported proposals.
    pub fn from_snapshot(proposals: Vec<Proposal>) -> Self {
        let map = proposals
            .into_iter()
            .map(|p| (p.id.clone(), Arc::new(RwLock::new(p))))
            .collect();
        Self {
            proposals: RwLock::new(map),
        }
    }

    /// Export a copy of every proposal (external retention).
    pub fn snapshot(&self) -> Vec<Proposal> {
        let map = self.proposals.read().unwrap();
        let mut all: Vec<Proposal> = map.values().map(|p| p.read().unwrap().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        all
    }

    /// Create and insert a PENDING proposal, returning a copy.
    ///
    /// The proposal becomes visible to readers only once fully built.
    pub fn create(
        &self,
        meeting_request: MeetingRequest,
        ranked_slots: Vec<CandidateSlot>,
        reasoning: impl Into<String>,
    ) -> Proposal {
        let proposal = Proposal::new(meeting_request, ranked_slots, reasoning);
        let copy = proposal.clone();
        self.proposals
            .write()
            .unwrap()
            .insert(proposal.id.clone(), Arc::new(RwLock::new(proposal)));
        copy
    }

    /// Read-only projection of a proposal.
    pub fn get(&self, proposal_id: &str) -> Result<Proposal, StoreError> {
        let entry = self.entry(proposal_id)?;
        let guard = entry.read().unwrap();
        Ok(guard.clone())
    }

    /// Confirm one candidate slot of a PENDING proposal.
    ///
    /// Status and `confirmed_slot_index` move together under the entry
    /// lock; on any failure nothing changes. Concurrent confirms on the
    /// same id see exactly one success, the rest `AlreadyConfirmed`.
    pub fn confirm(&self, proposal_id: &str, slot_index: usize) -> Result<Proposal, StoreError> {
        let entry = self.entry(proposal_id)?;
        let mut proposal = entry.write().unwrap();

        match proposal.status {
            ProposalStatus::Confirmed => {
                return Err(StoreError::AlreadyConfirmed {
                    id: proposal_id.to_string(),
                })
            }
            ProposalStatus::Cancelled => {
                return Err(StoreError::ProposalCancelled {
                    id: proposal_id.to_string(),
                })
            }
            ProposalStatus::Pending => {}
        }

        if slot_index >= proposal.candidate_slots.len() {
            return Err(StoreError::InvalidSlotIndex {
                index: slot_index,
                len: proposal.candidate_slots.len(),
            });
        }

        proposal.status = ProposalStatus::Confirmed;
        proposal.confirmed_slot_index = Some(slot_index);
        Ok(proposal.clone())
    }

    pub fn len(&self) -> usize {
        self.proposals.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, proposal_id: &str) -> Result<Arc<RwLock<Proposal>>, StoreError> {
        self.proposals
            .read()
            .unwrap()
            .get(proposal_id)
            .cloned()
            .ok_or_else(|| StoreError::ProposalNotFound {
                id: proposal_id.to_string(),
            })
    }
}
