//! Google Calendar + Gmail gateway adapter.
//!
//! Implements [`CalendarGateway`] over the Google APIs: freeBusy for
//! busy intervals, Calendar event insert for confirmed meetings, Gmail
//! send for notifications. Each participant acts under their own bearer
//! token; OAuth flows and credential storage live outside this crate,
//! tokens are injected by the caller.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;

use super::traits::{AuthDirectory, CalendarGateway, EmailMessage, EventDraft};
use crate::error::GatewayError;
use crate::interval::{Horizon, TimeInterval};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Google APIs gateway with per-participant credentials.
pub struct GoogleGateway {
    client: Client,
    base_url: String,
    /// Access token per authenticated participant.
    tokens: HashMap<String, String>,
}

impl GoogleGateway {
    /// Create a gateway with no credentials.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            tokens: HashMap::new(),
        }
    }

    /// Register an access token for a participant.
    pub fn with_token(
        mut self,
        participant_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.tokens.insert(participant_id.into(), token.into());
        self
    }

    /// Point the gateway at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn token_for(&self, participant_id: &str) -> Result<&str, GatewayError> {
        self.tokens
            .get(participant_id)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::NotAuthenticated {
                participant_id: participant_id.to_string(),
            })
    }

    fn endpoint(&self, path: &str) -> Result<String, GatewayError> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| GatewayError::MalformedResponse(format!("bad base url: {e}")))?;
        let joined = base
            .join(path)
            .map_err(|e| GatewayError::MalformedResponse(format!("bad endpoint {path}: {e}")))?;
        Ok(joined.to_string())
    }

    async fn check(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                endpoint: endpoint.to_string(),
                message: format!("{status}: {message}"),
            });
        }
        Ok(response.json().await?)
    }

    fn parse_busy(
        participant_id: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<TimeInterval>, GatewayError> {
        let periods = body["calendars"][participant_id]["busy"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut busy = Vec::with_capacity(periods.len());
        for period in &periods {
            let start = parse_rfc3339(&period["start"])?;
            let end = parse_rfc3339(&period["end"])?;
            // Zero-length records are provider noise; the calculator
            // would drop them anyway.
            if start < end {
                busy.push(TimeInterval {
                    start,
                    end,
                    available: false,
                });
            }
        }
        Ok(busy)
    }
}

impl Default for GoogleGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rfc3339(value: &serde_json::Value) -> Result<DateTime<Utc>, GatewayError> {
    let text = value
        .as_str()
        .ok_or_else(|| GatewayError::MalformedResponse(format!("expected timestamp, got {value}")))?;
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GatewayError::MalformedResponse(format!("bad timestamp '{text}': {e}")))
}

/// Build the RFC 2822 message Gmail expects in its `raw` field.
fn encode_raw_message(message: &EmailMessage, sender_id: &str) -> String {
    let mime = format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{}",
        sender_id,
        message.to.join(", "),
        message.subject,
        message.body,
    );
    general_purpose::URL_SAFE.encode(mime)
}

#[async_trait]
impl CalendarGateway for GoogleGateway {
    async fn fetch_busy_intervals(
        &self,
        participant_id: &str,
        horizon: &Horizon,
    ) -> Result<Vec<TimeInterval>, GatewayError> {
        let token = self.token_for(participant_id)?;
        let endpoint = self.endpoint("calendar/v3/freeBusy")?;

        let body = json!({
            "timeMin": horizon.start().to_rfc3339(),
            "timeMax": horizon.end().to_rfc3339(),
            "items": [{"id": participant_id}],
        });

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let body = Self::check(&endpoint, response).await?;
        Self::parse_busy(participant_id, &body)
    }

    async fn create_event(
        &self,
        event: &EventDraft,
        organizer_id: &str,
    ) -> Result<String, GatewayError> {
        let token = self.token_for(organizer_id)?;
        let endpoint = self.endpoint("calendar/v3/calendars/primary/events")?;

        let mut body = json!({
            "summary": event.title,
            "description": event.description,
            "start": {"dateTime": event.start.to_rfc3339()},
            "end": {"dateTime": event.end.to_rfc3339()},
            "attendees": event
                .attendees
                .iter()
                .map(|email| json!({"email": email}))
                .collect::<Vec<_>>(),
        });
        if let Some(location) = &event.location {
            body["location"] = json!(location);
        }

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let body = Self::check(&endpoint, response).await?;

        body["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| GatewayError::MalformedResponse("event insert returned no id".to_string()))
    }

    async fn send_email(
        &self,
        message: &EmailMessage,
        sender_id: &str,
    ) -> Result<(), GatewayError> {
        let token = self.token_for(sender_id)?;
        let endpoint = self.endpoint("gmail/v1/users/me/messages/send")?;

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(token)
            .json(&json!({"raw": encode_raw_message(message, sender_id)}))
            .send()
            .await?;
        Self::check(&endpoint, response).await?;
        Ok(())
    }
}

impl AuthDirectory for GoogleGateway {
    fn authenticated_participants(&self) -> Vec<String> {
        let mut participants: Vec<String> = self.tokens.keys().cloned().collect();
        participants.sort();
        participants
    }

    fn is_authenticated(&self, participant_id: &str) -> bool {
        self.tokens.contains_key(participant_id)
    }
}
