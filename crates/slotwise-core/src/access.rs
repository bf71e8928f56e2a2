//! Access classification for requested participants.
//!
//! Splits a participant list into those whose calendars are queryable
//! (authenticated) and those that are not. Denied participants remain
//! invited but contribute no constraint to the intersection.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Classification of requested participants, in request order.
///
/// Pure data: owns no calendar state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessReport {
    pub accessible_participants: Vec<String>,
    pub denied_participants: Vec<String>,
}

impl AccessReport {
    /// Check whether a participant's calendar may be queried.
    pub fn is_accessible(&self, participant_id: &str) -> bool {
        self.accessible_participants
            .iter()
            .any(|p| p == participant_id)
    }
}

/// Classify requested participants against the authenticated set.
///
/// Order within each bucket follows the request order, so downstream
/// aggregation stays deterministic.
pub fn classify_participants(
    requested: &[String],
    authenticated: &HashSet<String>,
) -> AccessReport {
    let mut accessible = Vec::new();
    let mut denied = Vec::new();
    for participant in requested {
        if authenticated.contains(participant) {
            accessible.push(participant.clone());
        } else {
            denied.push(participant.clone());
        }
    }
    AccessReport {
        accessible_participants: accessible,
        denied_participants: denied,
    }
}
