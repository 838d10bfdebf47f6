//! Class definitions
//!
//! A class is a named activity held at one hour of the school day.

use crate::types::TimeSlot;
use serde::{Deserialize, Serialize};

/// A class held at a fixed hour
///
/// Serialized with the field names used in tick responses
/// (`{"Name": .., "StartTime": ..}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Class name, unique within a school
    #[serde(rename = "Name")]
    pub name: String,
    /// Hour at which the class is held
    #[serde(rename = "StartTime")]
    pub start_slot: TimeSlot,
}

impl ClassDefinition {
    /// Create a new class definition
    pub fn new(name: impl Into<String>, start_slot: TimeSlot) -> Self {
        Self { name: name.into(), start_slot }
    }

    /// Check whether this class is held at the given hour
    pub fn is_held_at(&self, slot: TimeSlot) -> bool {
        self.start_slot == slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_is_held_at() {
        let class = ClassDefinition::new("History", TimeSlot::FIRST);
        assert!(class.is_held_at(TimeSlot::FIRST));
        assert!(!class.is_held_at(TimeSlot::new(2).unwrap()));
    }

    #[test]
    fn test_class_json_field_names() {
        let class = ClassDefinition::new("Jumping", TimeSlot::new(5).unwrap());
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json, serde_json::json!({ "Name": "Jumping", "StartTime": 5 }));
    }
}
