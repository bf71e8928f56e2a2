//! Per-participant availability collection.
//!
//! Fans out busy-interval fetches to the gateway, one task per
//! accessible participant with its own timeout, and folds the results
//! back in request order. A slow or failing participant degrades to an
//! unauthenticated/empty entry instead of delaying or failing the
//! batch.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::access::AccessReport;
use crate::error::GatewayError;
use crate::gateway::CalendarGateway;
use crate::interval::{FreeIntervalCalculator, Horizon, TimeInterval};

/// One participant's availability over the query horizon.
///
/// Free and busy intervals are mutually disjoint and together tile the
/// horizon when `authenticated` is true; denied or failed participants
/// carry empty lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantAvailability {
    pub participant_id: String,
    pub authenticated: bool,
    pub free_intervals: Vec<TimeInterval>,
    pub busy_intervals: Vec<TimeInterval>,
}

impl ParticipantAvailability {
    /// Entry for a participant we could not (or may not) query.
    fn unavailable(participant_id: &str) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            authenticated: false,
            free_intervals: Vec::new(),
            busy_intervals: Vec::new(),
        }
    }
}

/// Collects availability for a participant list through the gateway.
pub struct AvailabilityAggregator {
    gateway: Arc<dyn CalendarGateway>,
    fetch_timeout: Duration,
}

impl AvailabilityAggregator {
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        Self {
            gateway,
            fetch_timeout: Duration::from_secs(10),
        }
    }

    /// Deadline applied to each participant's fetch independently.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Fetch availability for every requested participant.
    ///
    /// # Arguments
    /// * `requested` - Participants in request order; output matches it
    /// * `report` - Access classification; denied entries are never queried
    /// * `horizon` - The query window
    /// * `min_duration_minutes` - Free intervals shorter than this are dropped
    ///
    /// # Errors
    /// Fails only when at least one participant was accessible and
    /// every accessible fetch failed or timed out.
    pub async fn collect(
        &self,
        requested: &[String],
        report: &AccessReport,
        horizon: &Horizon,
        min_duration_minutes: i64,
    ) -> Result<Vec<ParticipantAvailability>, GatewayError> {
        let calculator = FreeIntervalCalculator::new().with_min_duration(min_duration_minutes);
        let timeout_secs = self.fetch_timeout.as_secs();

        // Fan out: one task per accessible participant. The JoinSet
        // aborts outstanding fetches if this future is dropped.
        let mut join_set = tokio::task::JoinSet::new();
        for (index, participant) in requested.iter().enumerate() {
            if !report.is_accessible(participant) {
                continue;
            }
            let gateway = Arc::clone(&self.gateway);
            let participant_id = participant.clone();
            let horizon = *horizon;
            let timeout = self.fetch_timeout;
            join_set.spawn(async move {
                let result = match tokio::time::timeout(
                    timeout,
                    gateway.fetch_busy_intervals(&participant_id, &horizon),
                )
                .await
                {
                    Ok(fetched) => fetched,
                    Err(_elapsed) => Err(GatewayError::Timeout {
                        participant_id,
                        timeout_secs: timeout.as_secs(),
                    }),
                };
                (index, result)
            });
        }

        // Fan in: wait for every fetch, then fold in request order.
        let mut fetched: Vec<Option<Result<Vec<TimeInterval>, GatewayError>>> =
            (0..requested.len()).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => fetched[index] = Some(result),
                Err(e) => warn!(error = %e, timeout_secs, "fetch task failed"),
            }
        }

        let mut results = Vec::with_capacity(requested.len());
        let mut usable = 0usize;

        for (index, participant) in requested.iter().enumerate() {
            let busy = match fetched[index].take() {
                Some(Ok(busy)) => busy,
                Some(Err(e)) => {
                    warn!(participant = %participant, error = %e, "busy-interval fetch failed");
                    results.push(ParticipantAvailability::unavailable(participant));
                    continue;
                }
                // Denied, or the fetch task died before reporting.
                None => {
                    results.push(ParticipantAvailability::unavailable(participant));
                    continue;
                }
            };

            let free = calculator.free_intervals(&busy, horizon);
            usable += 1;
            results.push(ParticipantAvailability {
                participant_id: participant.clone(),
                authenticated: true,
                free_intervals: free,
                busy_intervals: busy,
            });
        }

        let attempted = report.accessible_participants.len();
        if attempted > 0 && usable == 0 {
            return Err(GatewayError::NoUsableAvailability { attempted });
        }

        Ok(results)
    }
}
