//! School hours and the cyclic hour counter
//!
//! This module contains the [`TimeSlot`] value type and the [`SlotCounter`]
//! that advances through the school day.

use crate::simulation::error::{SchoolError, SchoolResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Number of hours in the default school day
pub const DEFAULT_MAX_SLOT: u32 = 8;

/// One hour of the school day, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimeSlot(u32);

impl TimeSlot {
    /// The first hour of the day
    pub const FIRST: TimeSlot = TimeSlot(1);

    /// Create a time slot, rejecting hour 0
    pub fn new(hour: u32) -> SchoolResult<Self> {
        if hour == 0 {
            return Err(SchoolError::InvalidSlot { slot: hour, max_slot: None });
        }
        Ok(Self(hour))
    }

    /// Create a time slot that must also fit within a day of `max_slot` hours
    pub fn within(hour: u32, max_slot: u32) -> SchoolResult<Self> {
        if hour == 0 || hour > max_slot {
            return Err(SchoolError::InvalidSlot { slot: hour, max_slot: Some(max_slot) });
        }
        Ok(Self(hour))
    }

    /// Get the hour number
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hour = u32::deserialize(deserializer)?;
        TimeSlot::new(hour).map_err(serde::de::Error::custom)
    }
}

/// Cyclic hour counter running over `[1, max_slot]`
///
/// The counter starts before the first hour of the day; the first call to
/// [`SlotCounter::advance`] yields hour 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCounter {
    current: u32,
    max_slot: u32,
}

impl SlotCounter {
    /// Create a counter for a day of `max_slot` hours
    pub fn new(max_slot: u32) -> SchoolResult<Self> {
        if max_slot == 0 {
            return Err(SchoolError::configuration_error("max_slot must be at least 1"));
        }
        Ok(Self { current: 0, max_slot })
    }

    /// Move to the next hour, wrapping past the last hour back to 1
    pub fn advance(&mut self) -> TimeSlot {
        self.current = (self.current % self.max_slot) + 1;
        TimeSlot(self.current)
    }

    /// The current hour, or `None` before the first advance
    pub fn current(&self) -> Option<TimeSlot> {
        (self.current != 0).then_some(TimeSlot(self.current))
    }

    /// Number of hours in the day
    pub fn max_slot(&self) -> u32 {
        self.max_slot
    }
}

impl Default for SlotCounter {
    fn default() -> Self {
        Self { current: 0, max_slot: DEFAULT_MAX_SLOT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_rejects_zero() {
        assert!(TimeSlot::new(0).is_err());
        assert_eq!(TimeSlot::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_time_slot_within_range() {
        assert!(TimeSlot::within(8, 8).is_ok());
        assert!(TimeSlot::within(9, 8).is_err());
        assert!(TimeSlot::within(0, 8).is_err());
    }

    #[test]
    fn test_counter_starts_before_first_hour() {
        let counter = SlotCounter::default();
        assert_eq!(counter.current(), None);
        assert_eq!(counter.max_slot(), DEFAULT_MAX_SLOT);
    }

    #[test]
    fn test_counter_first_advance_is_hour_one() {
        let mut counter = SlotCounter::default();
        assert_eq!(counter.advance(), TimeSlot::FIRST);
        assert_eq!(counter.current(), Some(TimeSlot::FIRST));
    }

    #[test]
    fn test_counter_stays_in_range() {
        let mut counter = SlotCounter::new(8).unwrap();
        for _ in 0..100 {
            let slot = counter.advance().get();
            assert!((1..=8).contains(&slot), "slot {} out of range", slot);
        }
    }

    #[test]
    fn test_counter_wraps_to_one() {
        let mut counter = SlotCounter::new(8).unwrap();
        counter.advance();
        for _ in 0..8 {
            counter.advance();
        }
        assert_eq!(counter.current(), Some(TimeSlot::FIRST));

        let mut counter = SlotCounter::new(3).unwrap();
        let hours: Vec<u32> = (0..7).map(|_| counter.advance().get()).collect();
        assert_eq!(hours, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_single_hour_day() {
        let mut counter = SlotCounter::new(1).unwrap();
        assert_eq!(counter.advance().get(), 1);
        assert_eq!(counter.advance().get(), 1);
    }

    #[test]
    fn test_counter_rejects_empty_day() {
        assert!(SlotCounter::new(0).is_err());
    }

    #[test]
    fn test_time_slot_serde() {
        let slot = TimeSlot::new(5).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "5");
        let parsed: TimeSlot = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.get(), 7);
        assert!(serde_json::from_str::<TimeSlot>("0").is_err());
    }
}
