//! Error types and handling
//!
//! This module contains error types and error handling for the school simulation.

use crate::types::TimeSlot;
use thiserror::Error;

/// Errors that can occur while setting up or ticking the school
#[derive(Debug, Error)]
pub enum SchoolError {
    /// No class is scheduled for the hour
    #[error("No class found for hour {slot}")]
    ClassNotFound {
        /// Hour that was resolved
        slot: TimeSlot,
    },

    /// A class with the same name is already registered
    #[error("Class '{0}' is already registered")]
    DuplicateClass(String),

    /// Another class already starts at this hour
    #[error("Class '{class}' cannot start at hour {slot}: '{existing}' is already scheduled there")]
    DuplicateStartSlot {
        /// Class being registered
        class: String,
        /// Class already holding the hour
        existing: String,
        /// Contested hour
        slot: TimeSlot,
    },

    /// Hour outside the school day
    #[error("Invalid hour {slot}{}", day_hint(.max_slot))]
    InvalidSlot {
        /// Offending hour
        slot: u32,
        /// Length of the school day, when known
        max_slot: Option<u32>,
    },

    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<crate::types::ConfigValidationError> for SchoolError {
    fn from(error: crate::types::ConfigValidationError) -> Self {
        SchoolError::ConfigurationError(error.to_string())
    }
}

impl SchoolError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// A missing class is a gap in the timetable: the next tick may well
    /// find one. Setup errors are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SchoolError::ClassNotFound { .. } => true,
            SchoolError::DuplicateClass(_) => false,
            SchoolError::DuplicateStartSlot { .. } => false,
            SchoolError::InvalidSlot { .. } => false,
            SchoolError::ConfigurationError(_) => false,
            SchoolError::IoError(_) => true,
            SchoolError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SchoolError::ClassNotFound { .. } => "Schedule",
            SchoolError::DuplicateClass(_) => "Registry",
            SchoolError::DuplicateStartSlot { .. } => "Registry",
            SchoolError::InvalidSlot { .. } => "Registry",
            SchoolError::ConfigurationError(_) => "Configuration",
            SchoolError::IoError(_) => "IO",
            SchoolError::SerializationError(_) => "Serialization",
        }
    }

    /// HTTP-equivalent status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SchoolError::ClassNotFound { .. } => 404,
            SchoolError::DuplicateClass(_)
            | SchoolError::DuplicateStartSlot { .. }
            | SchoolError::InvalidSlot { .. }
            | SchoolError::ConfigurationError(_) => 400,
            SchoolError::IoError(_) | SchoolError::SerializationError(_) => 500,
        }
    }
}

fn day_hint(max_slot: &Option<u32>) -> String {
    max_slot.map(|max| format!(" (school day is 1..={})", max)).unwrap_or_default()
}

/// Result type for school operations
pub type SchoolResult<T> = Result<T, SchoolError>;
