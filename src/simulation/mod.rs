//! Tick orchestration and control
//!
//! This module contains the tick runner, telemetry capabilities, statistics
//! collection, logging setup and error handling.
//!
//! # Overview
//!
//! The simulation module drives the school one external trigger at a time:
//!
//! - **TickRunner**: advances the hour, resolves the class and runs attendance
//! - **Telemetry**: span and counter capability, backed by `tracing` or recorded in memory
//! - **TickStatistics**: collects and reports per-run counts
//! - **LoggingConfig**: global subscriber setup
//! - **SchoolError**: error handling for scheduling and tick operations
//!
//! # Usage Example
//!
//! ```rust
//! use goat_school_simulator::attendance::CancellationToken;
//! use goat_school_simulator::simulation::*;
//! use goat_school_simulator::types::*;
//! use std::sync::Arc;
//!
//! let config = SchoolConfig { instant: true, ..Default::default() };
//! let runner = TickRunner::from_config(&config, Arc::new(RecordingTelemetry::new())).unwrap();
//!
//! let report = runner.tick(&CancellationToken::new()).unwrap();
//! assert_eq!(report.class.name, "History");
//!
//! // Hour 3 has no class
//! runner.tick(&CancellationToken::new()).unwrap();
//! let empty = runner.tick(&CancellationToken::new());
//! assert!(is_empty_slot(&empty));
//! ```

pub mod error;
pub mod logging;
pub mod statistics;
pub mod telemetry;
pub mod tick;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use statistics::*;
pub use telemetry::*;
pub use tick::*;
