//! In-memory gateway and directory, backed by fixture data.
//!
//! Used by the CLI (offline operation against a JSON fixture) and by
//! tests that need scripted availability or observable side effects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::traits::{AuthDirectory, CalendarGateway, EmailMessage, EventDraft};
use crate::error::GatewayError;
use crate::interval::{Horizon, TimeInterval};

/// Directory over a fixed set of authenticated participants.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthDirectory {
    authenticated: Vec<String>,
}

impl StaticAuthDirectory {
    pub fn new(authenticated: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            authenticated: authenticated.into_iter().map(Into::into).collect(),
        }
    }
}

impl AuthDirectory for StaticAuthDirectory {
    fn authenticated_participants(&self) -> Vec<String> {
        self.authenticated.clone()
    }
}

/// Serializable calendar fixture: who is authenticated and their busy
/// intervals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarFixture {
    #[serde(default)]
    pub authenticated: Vec<String>,
    #[serde(default)]
    pub busy: HashMap<String, Vec<TimeInterval>>,
}

/// Gateway serving busy intervals from memory and recording the events
/// and emails it is asked to produce.
#[derive(Default)]
pub struct InMemoryGateway {
    busy: HashMap<String, Vec<TimeInterval>>,
    failing: HashSet<String>,
    created_events: Mutex<Vec<(EventDraft, String)>>,
    sent_emails: Mutex<Vec<(EmailMessage, String)>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a gateway from a fixture's busy map.
    pub fn from_fixture(fixture: &CalendarFixture) -> Self {
        Self {
            busy: fixture.busy.clone(),
            ..Self::default()
        }
    }

    /// Set a participant's busy intervals.
    pub fn with_busy(
        mut self,
        participant_id: impl Into<String>,
        intervals: Vec<TimeInterval>,
    ) -> Self {
        self.busy.insert(participant_id.into(), intervals);
        self
    }

    /// Make every fetch for this participant fail.
    pub fn with_failure(mut self, participant_id: impl Into<String>) -> Self {
        self.failing.insert(participant_id.into());
        self
    }

    /// Events created so far, paired with the organizer id.
    pub fn created_events(&self) -> Vec<(EventDraft, String)> {
        self.created_events.lock().unwrap().clone()
    }

    /// Emails sent so far, paired with the sender id.
    pub fn sent_emails(&self) -> Vec<(EmailMessage, String)> {
        self.sent_emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarGateway for InMemoryGateway {
    async fn fetch_busy_intervals(
        &self,
        participant_id: &str,
        _horizon: &Horizon,
    ) -> Result<Vec<TimeInterval>, GatewayError> {
        if self.failing.contains(participant_id) {
            return Err(GatewayError::Api {
                endpoint: "memory://freebusy".to_string(),
                message: format!("scripted failure for {participant_id}"),
            });
        }
        // Raw records; clamping to the horizon is the calculator's job.
        Ok(self.busy.get(participant_id).cloned().unwrap_or_default())
    }

    async fn create_event(
        &self,
        event: &EventDraft,
        organizer_id: &str,
    ) -> Result<String, GatewayError> {
        let event_id = uuid::Uuid::new_v4().to_string();
        self.created_events
            .lock()
            .unwrap()
            .push((event.clone(), organizer_id.to_string()));
        Ok(event_id)
    }

    async fn send_email(
        &self,
        message: &EmailMessage,
        sender_id: &str,
    ) -> Result<(), GatewayError> {
        self.sent_emails
            .lock()
            .unwrap()
            .push((message.clone(), sender_id.to_string()));
        Ok(())
    }
}
