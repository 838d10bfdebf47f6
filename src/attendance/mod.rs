//! Attendance simulation
//!
//! Once a class is resolved for the current hour, its students attend it
//! one after another. Each attendance lasts a bounded random time and runs
//! inside its own telemetry span.
//!
//! # Overview
//!
//! - **AttendanceSimulator**: runs a class, student by student
//! - **AttendanceApi**: the capability trait tick callers depend on
//! - **DurationSource / Sleeper**: injectable pacing
//! - **CancellationToken**: stops a running class between students
//!
//! # Usage Example
//!
//! ```rust
//! use goat_school_simulator::attendance::*;
//! use goat_school_simulator::school::{ClassDefinition, Student};
//! use goat_school_simulator::simulation::RecordingTelemetry;
//! use goat_school_simulator::types::TimeSlot;
//! use std::sync::Arc;
//!
//! let simulator = AttendanceSimulator::new(
//!     ScriptedDurations::from_millis(&[150]),
//!     Arc::new(InstantSleeper),
//!     Arc::new(RecordingTelemetry::new()),
//! );
//!
//! let class = ClassDefinition::new("History", TimeSlot::FIRST);
//! let students = vec![Student::new("Billy", 5, ["History"])];
//! let report = simulator.run_class(&class, &students, &CancellationToken::new());
//! assert!(report.is_complete());
//! ```

pub mod pacing;
pub mod simulator;

// Re-export all public types for convenience
pub use pacing::*;
pub use simulator::*;
