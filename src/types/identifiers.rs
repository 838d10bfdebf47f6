//! Unique identifier types for the school simulator
//!
//! Ticks are identified by UUIDs so that individual tick reports can be
//! correlated with their log lines.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a single school tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub Uuid);

impl TickId {
    /// Create a new random tick ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TickId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TICK_{}", self.0.simple())
    }
}

impl Serialize for TickId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("TICK_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for TickId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("TICK_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(TickId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_id_uniqueness() {
        assert_ne!(TickId::new(), TickId::new());
    }

    #[test]
    fn test_tick_id_display_prefix() {
        let id = TickId::new();
        assert!(id.to_string().starts_with("TICK_"));
    }

    #[test]
    fn test_tick_id_serde_roundtrip() {
        let id = TickId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("TICK_"));
        let parsed: TickId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_tick_id_accepts_raw_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: TickId = serde_json::from_str(&format!("\"{}\"", uuid)).unwrap();
        assert_eq!(parsed.0, uuid);
    }
}
