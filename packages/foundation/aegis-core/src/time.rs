//! Timestamp handling.
//!
//! Timestamps carry both an ISO-8601 string and a
//! milliseconds-since-epoch integer on the wire; the integer is
//! authoritative. We store only the integer-backed `DateTime<Utc>` and derive
//! the ISO-8601 string at serialization time so the two can never drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire shape: `{"iso8601": "...", "millis": ...}`. The integer field is
/// authoritative on read; the string is derived, never hand-parsed, on
/// write.
#[derive(Serialize, Deserialize)]
struct WireTimestamp {
    iso8601: String,
    millis: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MeshTimestamp(DateTime<Utc>);

impl MeshTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now))
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn elapsed_hours_since(&self, earlier: &MeshTimestamp) -> f64 {
        (self.0 - earlier.0).num_milliseconds() as f64 / 3_600_000.0
    }
}

impl Default for MeshTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl Serialize for MeshTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireTimestamp {
            iso8601: self.iso8601(),
            millis: self.millis(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MeshTimestamp {
    /// The integer is authoritative: `millis` drives the reconstructed
    /// value, `iso8601` is accepted but not re-parsed against it.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireTimestamp::deserialize(deserializer)?;
        Ok(Self::from_millis(wire.millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_carries_both_iso8601_and_authoritative_millis() {
        let ts = MeshTimestamp::from_millis(1_700_000_000_123);
        let value = serde_json::to_value(ts).unwrap();
        assert_eq!(value["millis"], 1_700_000_000_123i64);
        assert_eq!(value["iso8601"], ts.iso8601());
    }

    #[test]
    fn round_trips_through_json_preserving_millis() {
        let ts = MeshTimestamp::from_millis(1_700_000_000_123);
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: MeshTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.millis(), ts.millis());
    }
}
