//! Microsecond timestamps
//!
//! Venue timestamps are ISO-8601 strings in GMT with a microsecond
//! fraction and a literal `Z` suffix. Internally everything is
//! microseconds since the epoch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{RecorderError, Result};

const ISO_8601_PARSE: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const ISO_8601_RENDER: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn micros(&self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_micros())
    }

    pub fn from_iso8601(text: &str) -> Result<Self> {
        let parsed = NaiveDateTime::parse_from_str(text, ISO_8601_PARSE)
            .map_err(|e| RecorderError::Decode(format!("bad timestamp '{text}': {e}")))?;
        Ok(Self(parsed.and_utc().timestamp_micros()))
    }

    pub fn to_iso8601(&self) -> String {
        DateTime::<Utc>::from_timestamp_micros(self.0)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .format(ISO_8601_RENDER)
            .to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Timestamp::from_micros)
                .ok_or_else(|| serde::de::Error::custom(format!("bad micros value: {number}"))),
            serde_json::Value::String(text) => {
                Timestamp::from_iso8601(text).map_err(serde::de::Error::custom)
            }
            other => Err(serde::de::Error::custom(format!(
                "expected micros or ISO-8601 string, got: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_venue_timestamp() {
        let ts = Timestamp::from_iso8601("2024-04-13T18:10:04.220677Z").unwrap();
        assert_eq!(ts.micros(), 1713031804220677);
    }

    #[test]
    fn test_render_reproduces_literal() {
        let literal = "2024-04-13T18:10:04.220677Z";
        let ts = Timestamp::from_iso8601(literal).unwrap();
        assert_eq!(ts.to_iso8601(), literal);
    }

    #[test]
    fn test_parse_without_fraction() {
        let ts = Timestamp::from_iso8601("2024-04-13T18:10:04Z").unwrap();
        assert_eq!(ts.micros(), 1713031804000000);
        assert_eq!(ts.to_iso8601(), "2024-04-13T18:10:04.000000Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Timestamp::from_iso8601("not-a-timestamp").is_err());
    }

    #[test]
    fn test_deserialize_from_string_and_micros() {
        let from_text: Timestamp =
            serde_json::from_str("\"2024-04-13T18:10:04.220677Z\"").unwrap();
        let from_micros: Timestamp = serde_json::from_str("1713031804220677").unwrap();
        assert_eq!(from_text, from_micros);
    }
}
