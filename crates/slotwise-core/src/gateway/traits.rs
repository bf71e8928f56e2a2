//! Capability interfaces for the calendar/mail provider and the
//! authentication directory.
//!
//! The engine depends only on these traits, never on a concrete
//! provider type; one adapter exists per provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::interval::{Horizon, TimeInterval};

/// A calendar event to be created for a confirmed meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// An outgoing email message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Calendar/mail provider operations.
///
/// All calls are fallible; the engine performs no internal retries and
/// does not assume idempotency.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Fetch one participant's busy intervals for the horizon.
    async fn fetch_busy_intervals(
        &self,
        participant_id: &str,
        horizon: &Horizon,
    ) -> Result<Vec<TimeInterval>, GatewayError>;

    /// Create a calendar event under the organizer's identity,
    /// returning the provider's event id.
    async fn create_event(
        &self,
        event: &EventDraft,
        organizer_id: &str,
    ) -> Result<String, GatewayError>;

    /// Send an email from the given sender's identity.
    async fn send_email(
        &self,
        message: &EmailMessage,
        sender_id: &str,
    ) -> Result<(), GatewayError>;
}

/// Directory of participants with valid stored credentials.
pub trait AuthDirectory: Send + Sync {
    /// Every participant whose calendar is currently queryable.
    fn authenticated_participants(&self) -> Vec<String>;

    /// Whether a single participant is authenticated.
    fn is_authenticated(&self, participant_id: &str) -> bool {
        self.authenticated_participants()
            .iter()
            .any(|p| p == participant_id)
    }
}
