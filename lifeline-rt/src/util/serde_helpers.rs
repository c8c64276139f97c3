//! Serialization helpers for common types.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde serialization module for Duration as milliseconds.
///
/// All operator-facing timeouts in this crate are expressed in milliseconds,
/// so reports and events serialize durations the same way.
pub mod duration_millis {
    use super::*;

    /// Serializes Duration as milliseconds (u64).
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    /// Deserializes Duration from milliseconds (u64).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TestStruct {
        #[serde(with = "duration_millis")]
        duration: Duration,
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_duration_millis_roundtrip() {
        let original = TestStruct {
            duration: Duration::from_millis(1500),
        };

        let json = serde_json::to_string(&original).expect("Serialization should succeed");
        assert!(json.contains("1500"));

        let deserialized: TestStruct =
            serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(original, deserialized);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_duration_millis_zero() {
        let test = TestStruct {
            duration: Duration::from_millis(0),
        };

        let json = serde_json::to_string(&test).expect("Serialization should succeed");
        let deserialized: TestStruct =
            serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(test.duration, deserialized.duration);
    }
}
