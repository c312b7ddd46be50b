//! Error types for the shift engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while tracking shifts, computing
//! earnings, or evaluating achievements.
//!
//! The taxonomy follows three families, all locally recoverable:
//!
//! - **Validation errors** (`InvalidJob`, `InvalidShift`, `InvalidBonus`,
//!   `JobNotFound`, `ShiftNotFound`) — bad caller input, rejected before any
//!   state mutation.
//! - **State errors** (`AlreadyTracking`, `NotTracking`) — violations of the
//!   tracker's Idle/Tracking state machine contract.
//! - **Persistence and configuration errors** (`Persistence`,
//!   `ConfigNotFound`, `ConfigParseError`, `InvalidConfig`) — failures from
//!   the gateway or the YAML loaders, propagated to the caller.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the shift engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shift_engine::error::EngineError;
///
/// let error = EngineError::NotTracking;
/// assert_eq!(error.to_string(), "No shift is currently being tracked");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A job failed validation before being saved.
    #[error("Invalid job field '{field}': {message}")]
    InvalidJob {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A shift failed validation before being saved.
    #[error("Invalid shift field '{field}': {message}")]
    InvalidShift {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A bonus failed validation before being saved.
    #[error("Invalid bonus field '{field}': {message}")]
    InvalidBonus {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No job exists with the given id.
    #[error("Job not found: {id}")]
    JobNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// No shift exists with the given id.
    #[error("Shift not found: {id}")]
    ShiftNotFound {
        /// The id that was looked up.
        id: Uuid,
    },

    /// `start_tracking` was called while a shift was already being tracked.
    ///
    /// The caller must end the current shift first; there is no implicit
    /// queuing of shifts.
    #[error("A shift is already being tracked: {shift_id}")]
    AlreadyTracking {
        /// The id of the shift currently being tracked.
        shift_id: Uuid,
    },

    /// `end_tracking` (or another Tracking-only operation) was called while
    /// no shift was being tracked.
    #[error("No shift is currently being tracked")]
    NotTracking,

    /// A save or fetch failed in the persistence gateway.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the gateway failure.
        message: String,
    },

    /// Configuration or catalog file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration or catalog file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of range or inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the invalid value.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
