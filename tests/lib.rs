// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use goat_school_simulator::*;
use std::sync::Arc;

#[test]
fn test_core_id_types() {
    let tick_id = TickId::new();
    assert_ne!(tick_id, TickId::new());
    assert!(tick_id.to_string().starts_with("TICK_"));
}

#[test]
fn test_time_slot_rejects_zero() {
    assert!(TimeSlot::new(0).is_err());
    assert_eq!(TimeSlot::new(8).unwrap().get(), 8);
    assert!(serde_json::from_str::<TimeSlot>("0").is_err());
    assert_eq!(serde_json::from_str::<TimeSlot>("3").unwrap().get(), 3);
}

#[test]
fn test_slot_counter_from_root() {
    let mut counter = SlotCounter::new(2).unwrap();
    assert_eq!(counter.current(), None);
    assert_eq!(counter.advance().get(), 1);
    assert_eq!(counter.advance().get(), 2);
    assert_eq!(counter.advance().get(), 1);
}

#[test]
fn test_runner_from_root_exports() {
    let config = SchoolConfig { instant: true, ..Default::default() };
    let runner = TickRunner::from_config(&config, Arc::new(RecordingTelemetry::new())).unwrap();

    let report: TickReport = runner.tick(&CancellationToken::new()).unwrap();
    assert_eq!(report.attendance.status, AttendanceStatus::Completed);

    let empty: SchoolResult<TickReport> = {
        runner.tick(&CancellationToken::new()).unwrap();
        runner.tick(&CancellationToken::new())
    };
    assert!(matches!(empty, Err(SchoolError::ClassNotFound { .. })));
}

#[test]
fn test_invalid_configuration_is_rejected_at_setup() {
    let config = SchoolConfig { school_name: "  ".to_string(), ..Default::default() };
    assert_eq!(config.validate(), Err(ConfigValidationError::EmptySchoolName));

    let error = School::from_config(&config).unwrap_err();
    assert_eq!(error.status_code(), 400);
    assert!(!error.is_recoverable());
}
