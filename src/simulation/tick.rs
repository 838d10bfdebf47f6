//! Tick orchestration
//!
//! This module contains the [`TickRunner`], the thin caller that turns one
//! external trigger into advance, resolve, enrollment lookup and attendance.

use crate::attendance::{AttendanceApi, AttendanceReport, AttendanceSimulator, CancellationToken};
use crate::school::{ClassDefinition, School, SchoolApi, Student};
use crate::simulation::error::{SchoolError, SchoolResult};
use crate::simulation::statistics::TickStatistics;
use crate::simulation::telemetry::{KeyValue, Telemetry};
use crate::types::{SchoolConfig, TickId, TimeSlot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument, warn};

/// Counter incremented once per tick request
pub const TICK_COUNTER: &str = "school_tick_requests";

/// Everything that happened during a tick that held a class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Identifier of the tick
    pub tick_id: TickId,
    /// Hour the school advanced to
    pub slot: TimeSlot,
    /// When the tick started
    pub started_at: DateTime<Utc>,
    /// Class held at the hour
    pub class: ClassDefinition,
    /// Students enrolled in the class, in roster order
    pub students: Vec<Student>,
    /// Outcome of the attendance run
    pub attendance: AttendanceReport,
}

/// Response body of a tick: the class and its students
#[derive(Debug, Serialize)]
pub struct TickResponse<'a> {
    /// Class held at the hour
    #[serde(rename = "Class")]
    pub class: &'a ClassDefinition,
    /// Students enrolled in the class
    #[serde(rename = "Students")]
    pub students: &'a [Student],
}

impl TickReport {
    /// The response body for this tick
    pub fn response(&self) -> TickResponse<'_> {
        TickResponse { class: &self.class, students: &self.students }
    }

    /// The response body as JSON indented by two spaces
    pub fn to_json_pretty(&self) -> SchoolResult<String> {
        Ok(serde_json::to_string_pretty(&self.response())?)
    }

    /// HTTP-equivalent status for a held class
    pub fn status_code(&self) -> u16 {
        200
    }
}

/// Drives the school one tick at a time
pub struct TickRunner {
    school: Arc<dyn SchoolApi>,
    attendance: Arc<dyn AttendanceApi>,
    telemetry: Arc<dyn Telemetry>,
    statistics: Mutex<TickStatistics>,
}

impl TickRunner {
    /// Create a runner from its collaborators
    pub fn new(
        school: Arc<dyn SchoolApi>,
        attendance: Arc<dyn AttendanceApi>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self { school, attendance, telemetry, statistics: Mutex::new(TickStatistics::new()) }
    }

    /// Build the school and the attendance simulator from configuration
    #[instrument(skip(config, telemetry), fields(school = %config.school_name))]
    pub fn from_config(config: &SchoolConfig, telemetry: Arc<dyn Telemetry>) -> SchoolResult<Self> {
        let school = School::from_config(config)?;
        let attendance = AttendanceSimulator::from_config(config, Arc::clone(&telemetry));
        Ok(Self::new(Arc::new(school), Arc::new(attendance), telemetry))
    }

    /// The school being driven
    pub fn school(&self) -> &dyn SchoolApi {
        self.school.as_ref()
    }

    /// Run one tick
    ///
    /// The hour advances before the class is resolved and stays advanced
    /// even when no class is found.
    pub fn tick(&self, cancel: &CancellationToken) -> SchoolResult<TickReport> {
        self.telemetry.increment_counter(TICK_COUNTER, 1);

        let tick_id = TickId::new();
        let started_at = Utc::now();
        let mut span = self
            .telemetry
            .start_span("school_tick", vec![KeyValue::new("school.name", self.school.name())]);

        let slot = self.school.advance();
        span.set_attribute("school.hour", slot.get());

        let class = match self.school.resolve_current_class(slot) {
            Ok(class) => class,
            Err(error) => {
                warn!("{} at {} has no class for hour {}", tick_id, self.school.name(), slot);
                span.set_error("could not find school class");
                self.lock_statistics().record_empty_slot(slot);
                return Err(error);
            }
        };

        let students = self.school.students_for(&class.name);
        let attendance = self.attendance.run_class(&class, &students, cancel);

        info!(
            "{} hour {}: {} attended by {}/{} students",
            tick_id,
            slot,
            class.name,
            attendance.attended_count(),
            students.len()
        );

        let report = TickReport { tick_id, slot, started_at, class, students, attendance };
        self.lock_statistics().record_held(&report);
        Ok(report)
    }

    /// Run `count` ticks, stopping early once `cancel` is set
    ///
    /// Empty hours are reported as errors in the returned list and do not
    /// stop the run.
    pub fn run_ticks(
        &self,
        count: usize,
        cancel: &CancellationToken,
    ) -> Vec<SchoolResult<TickReport>> {
        let mut results = Vec::new();
        for _ in 0..count {
            if cancel.is_cancelled() {
                break;
            }
            let result = self.tick(cancel);
            let fatal = matches!(&result, Err(error) if !error.is_recoverable());
            results.push(result);
            if fatal {
                break;
            }
        }
        results
    }

    /// Snapshot of the statistics gathered so far
    pub fn statistics(&self) -> TickStatistics {
        self.lock_statistics().clone()
    }

    fn lock_statistics(&self) -> MutexGuard<'_, TickStatistics> {
        self.statistics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for TickRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickRunner")
            .field("school", &self.school.name())
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

/// Whether a tick result means "no class this hour"
pub fn is_empty_slot(result: &SchoolResult<TickReport>) -> bool {
    matches!(result, Err(SchoolError::ClassNotFound { .. }))
}
