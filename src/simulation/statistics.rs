//! Statistics collection and reporting
//!
//! This module contains the per-run tick statistics and their summary report.

use crate::simulation::tick::TickReport;
use crate::types::TimeSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Counts gathered over a run of ticks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStatistics {
    /// Total number of ticks run
    pub ticks: usize,
    /// Ticks that held a class
    pub classes_held: usize,
    /// Ticks that found no class for their hour
    pub empty_slots: usize,
    /// Student attendances completed across all classes
    pub students_attended: usize,
    /// Class runs stopped by cancellation
    pub cancelled_runs: usize,
    /// Simulated time spent in class across all students
    pub attendance_time: Duration,
    /// Number of times each class was held
    pub held_by_class: BTreeMap<String, usize>,
    /// Hours that were found empty, in tick order
    pub empty_hours: Vec<u32>,
}

impl TickStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick that held a class
    pub fn record_held(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.classes_held += 1;
        self.students_attended += report.attendance.attended_count();
        self.attendance_time += report.attendance.total_duration();
        if !report.attendance.is_complete() {
            self.cancelled_runs += 1;
        }
        *self.held_by_class.entry(report.class.name.clone()).or_insert(0) += 1;
    }

    /// Record a tick whose hour had no class
    pub fn record_empty_slot(&mut self, slot: TimeSlot) {
        self.ticks += 1;
        self.empty_slots += 1;
        self.empty_hours.push(slot.get());
    }

    /// Percentage of ticks that held a class
    pub fn held_percentage(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            (self.classes_held as f64 / self.ticks as f64) * 100.0
        }
    }

    /// Average simulated attendance per student
    pub fn average_attendance(&self) -> Duration {
        match u32::try_from(self.students_attended) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.attendance_time / count,
        }
    }

    /// Generate a human-readable summary report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== School Day Summary ===\n\n");
        report.push_str(&format!("Ticks: {}\n", self.ticks));
        report.push_str(&format!(
            "  • Classes Held: {} ({:.1}%)\n",
            self.classes_held,
            self.held_percentage()
        ));
        report.push_str(&format!("  • Empty Hours: {} {:?}\n", self.empty_slots, self.empty_hours));
        report.push_str(&format!("  • Cancelled Classes: {}\n\n", self.cancelled_runs));

        report.push_str("Attendance:\n");
        report.push_str(&format!("  • Student Attendances: {}\n", self.students_attended));
        report.push_str(&format!(
            "  • Time in Class: {:.2} seconds (avg {} ms)\n",
            self.attendance_time.as_secs_f64(),
            self.average_attendance().as_millis()
        ));

        if !self.held_by_class.is_empty() {
            report.push_str("\nClasses:\n");
            for (name, count) in &self.held_by_class {
                report.push_str(&format!("  • {}: {}\n", name, count));
            }
        }

        report
    }
}

impl fmt::Display for TickStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{AttendanceReport, AttendanceStatus, StudentAttendance};
    use crate::school::ClassDefinition;
    use crate::types::TickId;

    fn report(class: &str, durations: &[u64], status: AttendanceStatus) -> TickReport {
        TickReport {
            tick_id: TickId::new(),
            slot: TimeSlot::FIRST,
            started_at: chrono::Utc::now(),
            class: ClassDefinition::new(class, TimeSlot::FIRST),
            students: Vec::new(),
            attendance: AttendanceReport {
                class_name: class.to_string(),
                attendances: durations
                    .iter()
                    .enumerate()
                    .map(|(i, ms)| StudentAttendance {
                        student_name: format!("student-{}", i),
                        duration_ms: *ms,
                    })
                    .collect(),
                status,
            },
        }
    }

    #[test]
    fn test_empty_statistics() {
        let stats = TickStatistics::new();
        assert_eq!(stats.ticks, 0);
        assert_eq!(stats.held_percentage(), 0.0);
        assert_eq!(stats.average_attendance(), Duration::ZERO);
    }

    #[test]
    fn test_record_held_and_empty() {
        let mut stats = TickStatistics::new();
        stats.record_held(&report("History", &[200, 400], AttendanceStatus::Completed));
        stats.record_held(&report("History", &[300], AttendanceStatus::Cancelled { remaining: 1 }));
        stats.record_empty_slot(TimeSlot::new(3).unwrap());

        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.classes_held, 2);
        assert_eq!(stats.empty_slots, 1);
        assert_eq!(stats.empty_hours, vec![3]);
        assert_eq!(stats.students_attended, 3);
        assert_eq!(stats.cancelled_runs, 1);
        assert_eq!(stats.attendance_time, Duration::from_millis(900));
        assert_eq!(stats.average_attendance(), Duration::from_millis(300));
        assert_eq!(stats.held_by_class.get("History"), Some(&2));
    }

    #[test]
    fn test_summary_report_mentions_classes() {
        let mut stats = TickStatistics::new();
        stats.record_held(&report("Jumping", &[150], AttendanceStatus::Completed));
        let summary = stats.to_string();
        assert!(summary.contains("School Day Summary"));
        assert!(summary.contains("Jumping: 1"));
        assert!(summary.contains("Classes Held: 1 (100.0%)"));
    }
}
