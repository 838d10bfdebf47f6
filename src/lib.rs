//! Goat School Simulator
//!
//! A small school timetable engine that advances a cyclic hour counter on each
//! external trigger, finds the class held at that hour and simulates its
//! enrolled students attending one after another.
//!
//! # Overview
//!
//! This library models a single school day as a ring of hours. Every tick moves
//! the clock forward by one hour, wrapping back to the first hour after the
//! last one. If a class starts at the new hour, its students attend it in
//! roster order, each for a bounded random time, with telemetry around the
//! whole class and around every student.
//!
//! ## Key Features
//!
//! - **Cyclic Scheduling**: a thread-safe hour counter shared by concurrent callers
//! - **Class Resolution**: exact start-hour lookup with a not-found outcome for empty hours
//! - **Sequential Attendance**: injectable pacing, cancellable between students
//! - **Telemetry Capability**: spans and counters backed by `tracing` or recorded for tests
//! - **Configurable School**: JSON configuration files with CLI overrides and validation
//!
//! ## Quick Start
//!
//! ```rust
//! use goat_school_simulator::*;
//! use std::sync::Arc;
//!
//! // The default school with instant attendance
//! let config = SchoolConfig { instant: true, ..Default::default() };
//! let runner = TickRunner::from_config(&config, Arc::new(RecordingTelemetry::new()))?;
//!
//! let report = runner.tick(&CancellationToken::new())?;
//! println!("{}", report.to_json_pretty()?);
//! assert_eq!(report.students.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Hours, identifiers, and configuration
//! - [`school`]: Classes, students, and the hour-tracking school
//! - [`attendance`]: Sequential attendance with injectable pacing
//! - [`simulation`]: Tick orchestration, telemetry, statistics, and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   School    │    │ Attendance  │
//! │             │    │             │    │             │
//! │ TimeSlot    │◄───┤ Scheduler   │    │ Simulator   │
//! │ Identifiers │    │ Classes     │    │ Pacing      │
//! │ Config      │    │ Students    │    │ Cancellation│
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                           ▲                  ▲
//!                           │                  │
//!                    ┌─────────────────────────────┐
//!                    │         Simulation          │
//!                    │                             │
//!                    │ TickRunner    Telemetry     │
//!                    │ Statistics    Logging       │
//!                    └─────────────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod attendance;
pub mod school;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    // Configuration
    CliArgs,
    ConfigValidationError,
    SchoolConfig,
    // Hours
    SlotCounter,
    // Identifiers
    TickId,
    TimeSlot,
};

// School model
pub use school::{ClassDefinition, School, SchoolApi, Student};

// Attendance
pub use attendance::{
    AttendanceApi, AttendanceReport, AttendanceSimulator, AttendanceStatus, CancellationToken,
    DurationSource, InstantSleeper, RandomDurations, ScriptedDurations, Sleeper, ThreadSleeper,
};

// Simulation types and functionality
pub use simulation::{
    LoggingConfig, RecordingTelemetry, SchoolError, SchoolResult, Telemetry, TickReport,
    TickRunner, TickStatistics, TracingTelemetry,
};
