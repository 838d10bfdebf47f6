//! Attendance pacing
//!
//! How long each student spends in class, how that time passes, and how a
//! caller stops a class early. All three are injected into the simulator so
//! that tests can run with scripted durations and no real delay.

use crate::types::config::pacing;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Source of per-student attendance durations
pub trait DurationSource: Send {
    /// Duration of the next student's attendance
    fn next_duration(&mut self) -> Duration;
}

/// Uniformly random durations in `[min, min + spread)`
pub struct RandomDurations {
    rng: StdRng,
    min_ms: u64,
    spread_ms: u64,
}

impl RandomDurations {
    /// Create a random source, seeded when `seed` is given
    pub fn new(min: Duration, spread: Duration, seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            debug!("Using deterministic attendance seed: {}", seed);
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        Self {
            rng,
            min_ms: u64::try_from(min.as_millis()).unwrap_or(u64::MAX),
            spread_ms: u64::try_from(spread.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// The school's standard window: 100ms plus up to 1000ms
    pub fn standard(seed: Option<u64>) -> Self {
        Self::new(
            Duration::from_millis(pacing::MIN_DURATION_MS),
            Duration::from_millis(pacing::DURATION_SPREAD_MS),
            seed,
        )
    }
}

impl fmt::Debug for RandomDurations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomDurations")
            .field("min_ms", &self.min_ms)
            .field("spread_ms", &self.spread_ms)
            .finish_non_exhaustive()
    }
}

impl DurationSource for RandomDurations {
    fn next_duration(&mut self) -> Duration {
        let jitter = if self.spread_ms == 0 { 0 } else { self.rng.gen_range(0..self.spread_ms) };
        Duration::from_millis(self.min_ms.saturating_add(jitter))
    }
}

/// A fixed list of durations, repeated in order
#[derive(Debug, Clone)]
pub struct ScriptedDurations {
    script: Vec<Duration>,
    next: usize,
}

impl ScriptedDurations {
    /// Create a source that cycles through `script`
    pub fn new(script: Vec<Duration>) -> Self {
        Self { script, next: 0 }
    }

    /// Create a source from millisecond values
    pub fn from_millis(script: &[u64]) -> Self {
        Self::new(script.iter().map(|ms| Duration::from_millis(*ms)).collect())
    }
}

impl DurationSource for ScriptedDurations {
    fn next_duration(&mut self) -> Duration {
        if self.script.is_empty() {
            return Duration::ZERO;
        }
        let duration = self.script[self.next % self.script.len()];
        self.next += 1;
        duration
    }
}

/// Suspends the calling thread while a student attends
pub trait Sleeper: Send + Sync {
    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeps on the real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) {}
}

/// Records every requested sleep instead of blocking
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to the simulator.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All requested sleeps in call order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Total virtual time slept
    pub fn elapsed(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(duration);
    }
}

/// Cooperative cancellation signal shared between a caller and a running class
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
