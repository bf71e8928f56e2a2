//! Meeting request types and organizer preferences.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted meeting duration bounds, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 480;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Meeting priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A meeting attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A request to schedule a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: i64,
    pub organizer: Participant,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub priority: Priority,
    /// Organizer's preferred weekday names, carried for reporting.
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default = "default_buffer_minutes")]
    pub buffer_time_minutes: i64,
}

impl MeetingRequest {
    /// All attendee addresses, organizer first.
    pub fn all_emails(&self) -> Vec<String> {
        std::iter::once(self.organizer.email.clone())
            .chain(self.participants.iter().map(|p| p.email.clone()))
            .collect()
    }

    /// Validate the request before any engine work.
    ///
    /// # Errors
    /// Returns the first violated bound: title length, description
    /// length, duration range, or an unaddressable attendee set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() || self.title.len() > MAX_TITLE_LEN {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: format!("must be 1-{MAX_TITLE_LEN} characters"),
            });
        }
        if self.description.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::InvalidValue {
                field: "description".to_string(),
                message: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
            });
        }
        if self.duration_minutes < MIN_DURATION_MINUTES
            || self.duration_minutes > MAX_DURATION_MINUTES
        {
            return Err(ValidationError::InvalidDuration {
                minutes: self.duration_minutes,
                min: MIN_DURATION_MINUTES,
                max: MAX_DURATION_MINUTES,
            });
        }
        if self.all_emails().iter().all(|e| e.is_empty()) {
            return Err(ValidationError::EmptyParticipants);
        }
        Ok(())
    }
}

/// Organizer scheduling preferences.
///
/// `buffer_time_minutes` and `preferred_meeting_days` are carried as
/// data and reported in proposal reasoning; the slot policy itself only
/// reads the work-hour window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default = "default_work_start")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end")]
    pub work_end_hour: u32,
    #[serde(default = "default_buffer_minutes")]
    pub buffer_time_minutes: i64,
    #[serde(default = "default_preferred_days")]
    pub preferred_meeting_days: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl UserPreferences {
    /// Validate the work-hour window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.work_start_hour >= self.work_end_hour || self.work_end_hour > 24 {
            return Err(ValidationError::InvalidWorkHours {
                start: self.work_start_hour,
                end: self.work_end_hour,
            });
        }
        Ok(())
    }
}

fn default_work_start() -> u32 {
    9
}
fn default_work_end() -> u32 {
    17
}
fn default_buffer_minutes() -> i64 {
    15
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_preferred_days() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            work_start_hour: default_work_start(),
            work_end_hour: default_work_end(),
            buffer_time_minutes: default_buffer_minutes(),
            preferred_meeting_days: default_preferred_days(),
            timezone: default_timezone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> MeetingRequest {
        MeetingRequest {
            title: "Sprint planning".to_string(),
            description: "Plan the next sprint".to_string(),
            duration_minutes: 30,
            organizer: Participant::new("Alice", "alice@example.com"),
            participants: vec![Participant::new("Bob", "bob@example.com")],
            priority: Priority::Medium,
            preferred_days: Vec::new(),
            buffer_time_minutes: 15,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(make_request().validate().is_ok());
    }

    #[test]
    fn duration_bounds_are_enforced() {
        let mut request = make_request();
        request.duration_minutes = 10;
        assert!(matches!(
            request.validate(),
            Err(ValidationError::InvalidDuration { minutes: 10, .. })
        ));

        request.duration_minutes = 481;
        assert!(request.validate().is_err());

        request.duration_minutes = 480;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut request = make_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn attendees_need_an_address() {
        let mut request = make_request();
        request.organizer.email = String::new();
        request.participants.clear();
        assert!(matches!(
            request.validate(),
            Err(ValidationError::EmptyParticipants)
        ));
    }

    #[test]
    fn all_emails_keeps_organizer_first() {
        let request = make_request();
        assert_eq!(
            request.all_emails(),
            vec!["alice@example.com".to_string(), "bob@example.com".to_string()]
        );
    }

    #[test]
    fn preference_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.work_start_hour, 9);
        assert_eq!(prefs.work_end_hour, 17);
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn inverted_work_hours_are_rejected() {
        let prefs = UserPreferences {
            work_start_hour: 18,
            work_end_hour: 9,
            ..UserPreferences::default()
        };
        assert!(matches!(
            prefs.validate(),
            Err(ValidationError::InvalidWorkHours { start: 18, end: 9 })
        ));
    }

    #[test]
    fn priority_serde_is_lowercase() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"urgent\"");
        let back: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Priority::High);
    }
}
