//! Sequential attendance simulation
//!
//! This module contains the [`AttendanceSimulator`], which walks through the
//! students of a resolved class one at a time and lets each of them spend a
//! bounded amount of time in class.

use crate::attendance::pacing::{
    CancellationToken, DurationSource, InstantSleeper, RandomDurations, Sleeper, ThreadSleeper,
};
use crate::school::{ClassDefinition, Student};
use crate::simulation::telemetry::{KeyValue, Telemetry};
use crate::types::SchoolConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs the attendance of a class
pub trait AttendanceApi: Send + Sync {
    /// Let every student attend `class`, one after another
    ///
    /// Cancellation is checked before each student; once requested, the
    /// remaining students are skipped and the report says how many.
    fn run_class(
        &self,
        class: &ClassDefinition,
        students: &[Student],
        cancel: &CancellationToken,
    ) -> AttendanceReport;
}

/// One student's time in class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAttendance {
    /// Student name
    pub student_name: String,
    /// Time spent in class, in milliseconds
    pub duration_ms: u64,
}

/// How a class run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Every student attended
    Completed,
    /// The run was cancelled before `remaining` students attended
    Cancelled {
        /// Students that never started
        remaining: usize,
    },
}

/// Outcome of one class run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Name of the class
    pub class_name: String,
    /// Students who attended, in the order they attended
    pub attendances: Vec<StudentAttendance>,
    /// How the run ended
    pub status: AttendanceStatus,
}

impl AttendanceReport {
    /// Check whether every student attended
    pub fn is_complete(&self) -> bool {
        self.status == AttendanceStatus::Completed
    }

    /// Number of students who attended
    pub fn attended_count(&self) -> usize {
        self.attendances.len()
    }

    /// Sum of all attendance durations
    pub fn total_duration(&self) -> Duration {
        self.attendances.iter().map(|a| Duration::from_millis(a.duration_ms)).sum()
    }
}

/// Simulates class attendance with injected pacing and telemetry
pub struct AttendanceSimulator {
    durations: Mutex<Box<dyn DurationSource>>,
    sleeper: Arc<dyn Sleeper>,
    telemetry: Arc<dyn Telemetry>,
}

impl AttendanceSimulator {
    /// Create a simulator from its collaborators
    pub fn new(
        durations: impl DurationSource + 'static,
        sleeper: Arc<dyn Sleeper>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self { durations: Mutex::new(Box::new(durations)), sleeper, telemetry }
    }

    /// Create a simulator paced by the configured duration window
    ///
    /// Uses the real clock unless the configuration asks for instant runs.
    pub fn from_config(config: &SchoolConfig, telemetry: Arc<dyn Telemetry>) -> Self {
        let (min_ms, spread_ms) = config.duration_window_ms();
        let durations = RandomDurations::new(
            Duration::from_millis(min_ms),
            Duration::from_millis(spread_ms),
            config.seed,
        );
        let sleeper: Arc<dyn Sleeper> =
            if config.instant { Arc::new(InstantSleeper) } else { Arc::new(ThreadSleeper) };
        Self::new(durations, sleeper, telemetry)
    }

    fn next_duration(&self) -> Duration {
        self.durations.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).next_duration()
    }
}

impl fmt::Debug for AttendanceSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttendanceSimulator").finish_non_exhaustive()
    }
}

impl AttendanceApi for AttendanceSimulator {
    fn run_class(
        &self,
        class: &ClassDefinition,
        students: &[Student],
        cancel: &CancellationToken,
    ) -> AttendanceReport {
        let mut class_span = self
            .telemetry
            .start_span("attend_class", vec![KeyValue::new("class.name", class.name.as_str())]);
        class_span.set_attribute("class.students", students.len());

        let mut attendances = Vec::with_capacity(students.len());

        for (index, student) in students.iter().enumerate() {
            if cancel.is_cancelled() {
                let remaining = students.len() - index;
                warn!(
                    "Class {} cancelled with {} of {} students left",
                    class.name,
                    remaining,
                    students.len()
                );
                class_span.set_error("attendance cancelled");
                return AttendanceReport {
                    class_name: class.name.clone(),
                    attendances,
                    status: AttendanceStatus::Cancelled { remaining },
                };
            }

            debug!(student = %student.name, class = %class.name, "adding student to class");
            let _student_span = self.telemetry.start_span(
                "attend_student",
                vec![KeyValue::new("student.name", student.name.as_str())],
            );

            let duration = self.next_duration();
            self.sleeper.sleep(duration);

            attendances.push(StudentAttendance {
                student_name: student.name.clone(),
                duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            });
        }

        info!("Class {} attended by {} students", class.name, attendances.len());
        AttendanceReport {
            class_name: class.name.clone(),
            attendances,
            status: AttendanceStatus::Completed,
        }
    }
}
