//! Keyword classification of email replies to meeting proposals.
//!
//! Deliberately independent of the proposal store: classifying a reply
//! never touches proposal state. Matching is case-insensitive substring
//! search, checked in confirmation → rejection → reschedule order.

use serde::{Deserialize, Serialize};

/// What a reply to a meeting proposal appears to say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Confirmation,
    Rejection,
    RescheduleRequest,
    Unclear,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmation => "confirmation",
            Self::Rejection => "rejection",
            Self::RescheduleRequest => "reschedule_request",
            Self::Unclear => "unclear",
        }
    }
}

const CONFIRM_KEYWORDS: &[&str] = &["yes", "confirm", "accept", "agree", "sounds good"];
const REJECT_KEYWORDS: &[&str] = &["no", "decline", "reject", "can't", "cannot"];
const RESCHEDULE_KEYWORDS: &[&str] = &["reschedule", "different time", "another time"];

/// Classify a reply body.
pub fn classify_response(body: &str) -> ResponseKind {
    let body_lower = body.to_lowercase();

    if CONFIRM_KEYWORDS.iter().any(|k| body_lower.contains(k)) {
        ResponseKind::Confirmation
    } else if REJECT_KEYWORDS.iter().any(|k| body_lower.contains(k)) {
        ResponseKind::Rejection
    } else if RESCHEDULE_KEYWORDS.iter().any(|k| body_lower.contains(k)) {
        ResponseKind::RescheduleRequest
    } else {
        ResponseKind::Unclear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmations() {
        assert_eq!(
            classify_response("Yes, that works for me!"),
            ResponseKind::Confirmation
        );
        assert_eq!(
            classify_response("Sounds good, see you then."),
            ResponseKind::Confirmation
        );
    }

    #[test]
    fn rejections() {
        assert_eq!(
            classify_response("I must decline, sorry."),
            ResponseKind::Rejection
        );
        assert_eq!(
            classify_response("I cannot make it."),
            ResponseKind::Rejection
        );
    }

    #[test]
    fn reschedule_requests() {
        assert_eq!(
            classify_response("Could we pick a different time?"),
            ResponseKind::RescheduleRequest
        );
    }

    #[test]
    fn unclear_replies() {
        assert_eq!(
            classify_response("Thanks for the invite."),
            ResponseKind::Unclear
        );
        assert_eq!(classify_response(""), ResponseKind::Unclear);
    }

    #[test]
    fn confirmation_wins_over_reschedule() {
        // Mixed signals resolve in match order.
        assert_eq!(
            classify_response("Yes, unless you prefer another time."),
            ResponseKind::Confirmation
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify_response("CONFIRMED."), ResponseKind::Confirmation);
    }
}
