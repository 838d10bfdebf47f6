//! Span and counter capabilities
//!
//! The scheduler and the attendance simulator never reach for a global
//! tracer or meter. They receive a [`Telemetry`] implementation instead:
//! [`TracingTelemetry`] maps spans onto `tracing` spans for real runs, and
//! [`RecordingTelemetry`] keeps an ordered event log for tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Value attached to a span attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Text value
    Str(String),
    /// Integer value
    Int(i64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) => write!(f, "{}", s),
            AttributeValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// A span attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Attribute key, e.g. `student.name`
    pub key: &'static str,
    /// Attribute value
    pub value: AttributeValue,
}

impl KeyValue {
    /// Create an attribute
    pub fn new(key: &'static str, value: impl Into<AttributeValue>) -> Self {
        Self { key, value: value.into() }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An open span; it ends when dropped
pub trait ActiveSpan {
    /// Attach an attribute to the open span
    fn set_attribute(&mut self, attribute: KeyValue);

    /// Mark the span as failed
    fn set_error(&mut self, message: &str);
}

/// Owning handle for an open span
pub struct SpanHandle(Box<dyn ActiveSpan>);

impl SpanHandle {
    /// Wrap a span implementation
    pub fn new(span: impl ActiveSpan + 'static) -> Self {
        Self(Box::new(span))
    }

    /// Attach an attribute to the span
    pub fn set_attribute(&mut self, key: &'static str, value: impl Into<AttributeValue>) {
        self.0.set_attribute(KeyValue::new(key, value));
    }

    /// Mark the span as failed
    pub fn set_error(&mut self, message: &str) {
        self.0.set_error(message);
    }
}

impl fmt::Debug for SpanHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanHandle").finish_non_exhaustive()
    }
}

/// Span creation and counting, injected into the core components
pub trait Telemetry: Send + Sync {
    /// Open a named span carrying the given attributes
    fn start_span(&self, name: &'static str, attributes: Vec<KeyValue>) -> SpanHandle;

    /// Add `by` to a named counter
    fn increment_counter(&self, name: &'static str, by: u64);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn join_attributes(attributes: &[KeyValue]) -> String {
    attributes.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Telemetry backed by `tracing` spans and in-memory counters
#[derive(Debug, Default)]
pub struct TracingTelemetry {
    counters: Mutex<HashMap<&'static str, u64>>,
}

impl TracingTelemetry {
    /// Create a new tracing-backed telemetry
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter
    pub fn counter(&self, name: &str) -> u64 {
        lock(&self.counters).get(name).copied().unwrap_or(0)
    }
}

struct TracingSpan {
    span: tracing::span::EnteredSpan,
    extra: Vec<KeyValue>,
}

impl TracingSpan {
    fn record(&mut self, attribute: KeyValue) {
        if !self.span.has_field(attribute.key) {
            // Undeclared keys are folded into a single text field
            self.extra.push(attribute);
            self.span.record("attributes", join_attributes(&self.extra).as_str());
            return;
        }
        match &attribute.value {
            AttributeValue::Str(value) => self.span.record(attribute.key, value.as_str()),
            AttributeValue::Int(value) => self.span.record(attribute.key, *value),
        };
    }
}

impl ActiveSpan for TracingSpan {
    fn set_attribute(&mut self, attribute: KeyValue) {
        self.record(attribute);
    }

    fn set_error(&mut self, message: &str) {
        self.span.record("otel.status_code", "ERROR");
        self.span.record("error", message);
    }
}

impl Telemetry for TracingTelemetry {
    fn start_span(&self, name: &'static str, attributes: Vec<KeyValue>) -> SpanHandle {
        use tracing::field::Empty;

        let span = tracing::info_span!(
            "school",
            otel.name = name,
            school.name = Empty,
            school.hour = Empty,
            class.name = Empty,
            class.students = Empty,
            student.name = Empty,
            attributes = Empty,
            otel.status_code = Empty,
            error = Empty,
        );
        let mut active = TracingSpan { span: span.entered(), extra: Vec::new() };
        for attribute in attributes {
            active.record(attribute);
        }
        SpanHandle::new(active)
    }

    fn increment_counter(&self, name: &'static str, by: u64) {
        let mut counters = lock(&self.counters);
        let total = counters.entry(name).or_insert(0);
        *total += by;
        debug!(counter = name, total = *total, "counter incremented");
    }
}

/// One observation made by [`RecordingTelemetry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
    /// A span was opened
    SpanStarted {
        /// Span name
        name: &'static str,
        /// Attributes given at start
        attributes: Vec<KeyValue>,
    },
    /// An attribute was added to an open span
    AttributeSet {
        /// Span name
        name: &'static str,
        /// Added attribute
        attribute: KeyValue,
    },
    /// A span was marked as failed
    SpanFailed {
        /// Span name
        name: &'static str,
        /// Failure message
        message: String,
    },
    /// A span was closed
    SpanEnded {
        /// Span name
        name: &'static str,
    },
    /// A counter was incremented
    CounterIncremented {
        /// Counter name
        name: &'static str,
        /// Increment
        by: u64,
    },
}

/// Telemetry that records every span and counter event in order
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTelemetry {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl RecordingTelemetry {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<TelemetryEvent> {
        lock(&self.events).clone()
    }

    /// Start attributes of every span with the given name, in opening order
    pub fn spans_named(&self, name: &str) -> Vec<Vec<KeyValue>> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                TelemetryEvent::SpanStarted { name: n, attributes } if *n == name => {
                    Some(attributes.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Sum of all increments of a counter
    pub fn counter(&self, name: &str) -> u64 {
        lock(&self.events)
            .iter()
            .map(|event| match event {
                TelemetryEvent::CounterIncremented { name: n, by } if *n == name => *by,
                _ => 0,
            })
            .sum()
    }

    /// Largest number of simultaneously open spans with the given name
    pub fn max_open_spans(&self, name: &str) -> usize {
        let mut open = 0usize;
        let mut max = 0usize;
        for event in lock(&self.events).iter() {
            match event {
                TelemetryEvent::SpanStarted { name: n, .. } if *n == name => {
                    open += 1;
                    max = max.max(open);
                }
                TelemetryEvent::SpanEnded { name: n } if *n == name => {
                    open = open.saturating_sub(1);
                }
                _ => {}
            }
        }
        max
    }

    fn push(&self, event: TelemetryEvent) {
        lock(&self.events).push(event);
    }
}

struct RecordedSpan {
    name: &'static str,
    recorder: RecordingTelemetry,
}

impl ActiveSpan for RecordedSpan {
    fn set_attribute(&mut self, attribute: KeyValue) {
        self.recorder.push(TelemetryEvent::AttributeSet { name: self.name, attribute });
    }

    fn set_error(&mut self, message: &str) {
        self.recorder
            .push(TelemetryEvent::SpanFailed { name: self.name, message: message.to_string() });
    }
}

impl Drop for RecordedSpan {
    fn drop(&mut self) {
        self.recorder.push(TelemetryEvent::SpanEnded { name: self.name });
    }
}

impl Telemetry for RecordingTelemetry {
    fn start_span(&self, name: &'static str, attributes: Vec<KeyValue>) -> SpanHandle {
        self.push(TelemetryEvent::SpanStarted { name, attributes });
        SpanHandle::new(RecordedSpan { name, recorder: self.clone() })
    }

    fn increment_counter(&self, name: &'static str, by: u64) {
        self.push(TelemetryEvent::CounterIncremented { name, by });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_display() {
        assert_eq!(KeyValue::new("class.name", "History").to_string(), "class.name=History");
        assert_eq!(KeyValue::new("school.hour", 3u32).to_string(), "school.hour=3");
    }

    #[test]
    fn test_recording_span_lifecycle() {
        let telemetry = RecordingTelemetry::new();
        {
            let mut span =
                telemetry.start_span("school_tick", vec![KeyValue::new("school.name", "Kid")]);
            span.set_attribute("school.hour", 4u32);
            span.set_error("could not find school class");
        }

        assert_eq!(
            telemetry.events(),
            vec![
                TelemetryEvent::SpanStarted {
                    name: "school_tick",
                    attributes: vec![KeyValue::new("school.name", "Kid")],
                },
                TelemetryEvent::AttributeSet {
                    name: "school_tick",
                    attribute: KeyValue::new("school.hour", 4u32),
                },
                TelemetryEvent::SpanFailed {
                    name: "school_tick",
                    message: "could not find school class".to_string(),
                },
                TelemetryEvent::SpanEnded { name: "school_tick" },
            ]
        );
    }

    #[test]
    fn test_recording_counters() {
        let telemetry = RecordingTelemetry::new();
        telemetry.increment_counter("school_tick_requests", 1);
        telemetry.increment_counter("school_tick_requests", 2);
        telemetry.increment_counter("other", 5);
        assert_eq!(telemetry.counter("school_tick_requests"), 3);
        assert_eq!(telemetry.counter("missing"), 0);
    }

    #[test]
    fn test_max_open_spans() {
        let telemetry = RecordingTelemetry::new();
        {
            let _outer = telemetry.start_span("attend_student", vec![]);
            let _inner = telemetry.start_span("attend_student", vec![]);
        }
        let _after = telemetry.start_span("attend_student", vec![]);
        assert_eq!(telemetry.max_open_spans("attend_student"), 2);
    }

    #[test]
    fn test_tracing_telemetry_counters() {
        let telemetry = TracingTelemetry::new();
        telemetry.increment_counter("school_tick_requests", 1);
        telemetry.increment_counter("school_tick_requests", 1);
        assert_eq!(telemetry.counter("school_tick_requests"), 2);

        // Spans work without a subscriber installed
        let mut span = telemetry.start_span("attend_class", vec![KeyValue::new("class.name", "x")]);
        span.set_attribute("class.students", 2usize);
    }

    type Fields = Arc<Mutex<Vec<(String, String)>>>;

    struct FieldCapture(Fields);

    struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

    impl tracing::field::Visit for FieldVisitor<'_> {
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }

        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FieldCapture {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            attrs.record(&mut FieldVisitor(&mut lock(&self.0)));
        }

        fn on_record(
            &self,
            _id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            values.record(&mut FieldVisitor(&mut lock(&self.0)));
        }
    }

    #[test]
    fn test_tracing_spans_record_attributes_as_fields() {
        use tracing_subscriber::layer::SubscriberExt;

        let fields: Fields = Arc::new(Mutex::new(Vec::new()));
        let subscriber =
            tracing_subscriber::Registry::default().with(FieldCapture(Arc::clone(&fields)));

        tracing::subscriber::with_default(subscriber, || {
            let telemetry = TracingTelemetry::new();
            let mut span = telemetry
                .start_span("attend_class", vec![KeyValue::new("class.name", "History")]);
            span.set_attribute("class.students", 2usize);
            span.set_attribute("room", "barn");
        });

        let fields = lock(&fields).clone();
        let has = |key: &str, value: &str| fields.iter().any(|(k, v)| k == key && v == value);
        assert!(has("otel.name", "attend_class"), "{:?}", fields);
        assert!(has("class.name", "History"), "{:?}", fields);
        assert!(has("class.students", "2"), "{:?}", fields);
        assert!(has("attributes", "room=barn"), "{:?}", fields);
    }
}
