//! Core types and identifiers for the school simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Slots**: the [`TimeSlot`] hour value and the cyclic [`SlotCounter`]
//! - **Identifiers**: UUID-based identifiers for ticks
//! - **Configuration**: school configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use goat_school_simulator::types::*;
//!
//! let mut counter = SlotCounter::new(8).unwrap();
//! assert_eq!(counter.advance().get(), 1);
//!
//! let config = SchoolConfig { ticks: 3, ..Default::default() };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod identifiers;
pub mod slot;

// Re-export all public types for convenience
pub use config::*;
pub use identifiers::*;
pub use slot::*;
