use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use slotwise_core::{
    EngineConfig, MeetingRequest, ScheduleOutcome, UserPreferences,
};

use crate::common::{
    build_engine, default_horizon, load_fixture, load_store, save_store, state_path, CliResult,
};

#[derive(Subcommand)]
pub enum MeetingAction {
    /// Propose meeting times from a request file
    Schedule {
        /// Meeting request JSON file
        #[arg(long)]
        request: PathBuf,
        /// Calendar fixture JSON file
        #[arg(long)]
        fixture: PathBuf,
        /// Preferences JSON file (defaults apply when omitted)
        #[arg(long)]
        prefs: Option<PathBuf>,
        /// Horizon length in days (config default when omitted)
        #[arg(long)]
        days: Option<i64>,
        /// Proposal state file (default: data dir)
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Confirm one slot of a pending proposal
    Confirm {
        /// Proposal id
        id: String,
        /// Candidate slot index
        slot: usize,
        /// Calendar fixture JSON file
        #[arg(long)]
        fixture: PathBuf,
        /// Proposal state file (default: data dir)
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Show one proposal
    Show {
        /// Proposal id
        id: String,
        /// Proposal state file (default: data dir)
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// List stored proposals
    List {
        /// Proposal state file (default: data dir)
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

pub fn run(action: MeetingAction) -> CliResult {
    match action {
        MeetingAction::Schedule {
            request,
            fixture,
            prefs,
            days,
            state,
        } => {
            let request: MeetingRequest =
                serde_json::from_str(&std::fs::read_to_string(&request)?)?;
            let preferences: UserPreferences = match prefs {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
                None => UserPreferences::default(),
            };
            let fixture = load_fixture(&fixture)?;
            let config = EngineConfig::load()?;
            let horizon = default_horizon(days.unwrap_or(config.horizon_days))?;

            let state = state_path(state)?;
            let store = Arc::new(load_store(&state)?);
            let engine = build_engine(&fixture, Arc::clone(&store), config);

            let runtime = tokio::runtime::Runtime::new()?;
            let outcome =
                runtime.block_on(engine.schedule_meeting(&request, &preferences, horizon))?;

            match outcome {
                ScheduleOutcome::Scheduled(proposal) => {
                    save_store(&store, &state)?;
                    println!("{}", serde_json::to_string_pretty(&proposal)?);
                }
                ScheduleOutcome::NoCommonAvailability { reason } => {
                    println!("no common availability: {reason}");
                }
            }
        }
        MeetingAction::Confirm {
            id,
            slot,
            fixture,
            state,
        } => {
            let fixture = load_fixture(&fixture)?;
            let config = EngineConfig::load()?;
            let state = state_path(state)?;
            let store = Arc::new(load_store(&state)?);
            let engine = build_engine(&fixture, Arc::clone(&store), config);

            let runtime = tokio::runtime::Runtime::new()?;
            let confirmed = runtime.block_on(engine.confirm_proposal(&id, slot))?;
            save_store(&store, &state)?;

            println!(
                "confirmed {} -> event {} at {}",
                id,
                confirmed.event_id,
                confirmed.confirmed_slot.format_label()
            );
        }
        MeetingAction::Show { id, state } => {
            let state = state_path(state)?;
            let store = load_store(&state)?;
            let proposal = store.get(&id).map_err(slotwise_core::SchedulingError::from)?;
            println!("{}", serde_json::to_string_pretty(&proposal)?);
        }
        MeetingAction::List { state } => {
            let state = state_path(state)?;
            let store = load_store(&state)?;
            for proposal in store.snapshot() {
                println!(
                    "{}  {:?}  {}  ({} slots)",
                    proposal.id,
                    proposal.status,
                    proposal.meeting_request.title,
                    proposal.candidate_slots.len()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::load_store;
    use slotwise_core::ProposalStatus;

    #[test]
    fn schedule_confirm_show_flow_persists_state() {
        let dir = tempfile::tempdir().unwrap();
        let request_path = dir.path().join("request.json");
        let fixture_path = dir.path().join("fixture.json");
        let state = dir.path().join("proposals.json");

        std::fs::write(
            &request_path,
            r#"{
                "title": "Weekly sync",
                "duration_minutes": 30,
                "organizer": {"name": "Alice", "email": "alice@example.com"},
                "participants": [{"name": "Bob", "email": "bob@example.com"}]
            }"#,
        )
        .unwrap();
        std::fs::write(
            &fixture_path,
            r#"{"authenticated": ["alice@example.com", "bob@example.com"], "busy": {}}"#,
        )
        .unwrap();

        run(MeetingAction::Schedule {
            request: request_path,
            fixture: fixture_path.clone(),
            prefs: None,
            days: Some(7),
            state: Some(state.clone()),
        })
        .unwrap();

        let store = load_store(&state).unwrap();
        assert_eq!(store.len(), 1);
        let proposal = store.snapshot().remove(0);
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert!(!proposal.candidate_slots.is_empty());

        run(MeetingAction::Confirm {
            id: proposal.id.clone(),
            slot: 0,
            fixture: fixture_path,
            state: Some(state.clone()),
        })
        .unwrap();

        let store = load_store(&state).unwrap();
        let confirmed = store.get(&proposal.id).unwrap();
        assert_eq!(confirmed.status, ProposalStatus::Confirmed);
        assert_eq!(confirmed.confirmed_slot_index, Some(0));

        run(MeetingAction::Show {
            id: proposal.id,
            state: Some(state),
        })
        .unwrap();
    }
}
