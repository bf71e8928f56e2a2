//! Core error types for slotwise-core.
//!
//! This module defines the error hierarchy using thiserror, one
//! sub-enum per concern: request validation, access control, gateway
//! I/O, the proposal store, and configuration.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for slotwise-core.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Request or preference validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Access control errors
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Calendar/mail gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Proposal store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The intersection produced no slot of the requested duration
    #[error("No candidate slots common to all authenticated participants")]
    NoCandidateSlots,
}

/// Validation errors, rejected before any engine work begins.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Malformed horizon or interval
    #[error("Invalid range: end ({end}) must be greater than start ({start})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Meeting duration outside the accepted bounds
    #[error("Invalid duration: {minutes} minutes (must be between {min} and {max})")]
    InvalidDuration { minutes: i64, min: i64, max: i64 },

    /// A meeting needs at least one attendee with an address
    #[error("Empty participant set: the meeting has no addressable attendees")]
    EmptyParticipants,

    /// Malformed work-hour window
    #[error("Invalid work hours: start hour {start} must be before end hour {end}")]
    InvalidWorkHours { start: u32, end: u32 },

    /// Invalid field value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Access control errors.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The organizer must be able to create the event and send mail
    #[error("Organizer '{participant_id}' is not authenticated")]
    OrganizerNotAuthenticated { participant_id: String },

    /// None of the requested participants has a queryable calendar
    #[error("No authenticated participants with availability data found")]
    NoAuthenticatedParticipants,
}

/// Calendar/mail gateway errors.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request
    #[error("API error from {endpoint}: {message}")]
    Api { endpoint: String, message: String },

    /// No stored credentials for this participant
    #[error("Not authenticated: no credentials for '{participant_id}'")]
    NotAuthenticated { participant_id: String },

    /// A per-participant fetch exceeded its deadline
    #[error("Timed out fetching busy intervals for '{participant_id}' after {timeout_secs}s")]
    Timeout {
        participant_id: String,
        timeout_secs: u64,
    },

    /// The provider answered with something we cannot interpret
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Every accessible participant's fetch failed or timed out
    #[error("No usable availability: all {attempted} accessible participant fetches failed")]
    NoUsableAvailability { attempted: usize },
}

/// Proposal store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unknown proposal id
    #[error("Proposal not found: {id}")]
    ProposalNotFound { id: String },

    /// The proposal was already confirmed (racing confirms land here)
    #[error("Proposal {id} is already confirmed")]
    AlreadyConfirmed { id: String },

    /// The proposal was cancelled
    #[error("Proposal {id} is cancelled")]
    ProposalCancelled { id: String },

    /// Slot index outside the candidate list
    #[error("Invalid slot index {index} for proposal with {len} candidate slots")]
    InvalidSlotIndex { index: usize, len: usize },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for SchedulingError
pub type Result<T, E = SchedulingError> = std::result::Result<T, E>;
