use std::path::PathBuf;

use clap::Subcommand;
use slotwise_core::{FreeIntervalCalculator, Horizon};

use crate::common::{default_horizon, load_fixture, CliResult};

#[derive(Subcommand)]
pub enum AvailabilityAction {
    /// Show a participant's free intervals from a fixture
    Free {
        /// Participant id (email)
        participant: String,
        /// Calendar fixture JSON file
        #[arg(long)]
        fixture: PathBuf,
        /// Horizon length in days
        #[arg(long, default_value_t = 7)]
        days: i64,
        /// Drop free intervals shorter than this (minutes)
        #[arg(long, default_value_t = 0)]
        min_duration: i64,
    },
}

pub fn run(action: AvailabilityAction) -> CliResult {
    match action {
        AvailabilityAction::Free {
            participant,
            fixture,
            days,
            min_duration,
        } => {
            let fixture = load_fixture(&fixture)?;
            let horizon: Horizon = default_horizon(days)?;

            let busy = fixture.busy.get(&participant).cloned().unwrap_or_default();
            let calculator = FreeIntervalCalculator::new().with_min_duration(min_duration);
            let free = calculator.free_intervals(&busy, &horizon);

            println!("{}", serde_json::to_string_pretty(&free)?);
        }
    }
    Ok(())
}
