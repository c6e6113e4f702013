//! Contract value types shared by adapters
//!
//! Amounts travel as decimal strings in contract JSON; expirations and
//! durations are externally tagged enums.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unsigned 128-bit amount encoded as a decimal string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint128(pub u128);

impl Uint128 {
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn u128(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Lossy conversion for percentage math
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Uint128(value)
    }
}

impl Serialize for Uint128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map(Uint128)
            .map_err(|_| de::Error::custom(format!("invalid Uint128 '{}'", raw)))
    }
}

/// When a proposal or claim expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    AtHeight(u64),
    /// Nanoseconds since the unix epoch, as a string
    AtTime(#[serde(with = "nanos")] u64),
    Never {},
}

impl Expiration {
    pub fn at_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Expiration::AtTime(nanos) => {
                let secs = (*nanos / 1_000_000_000) as i64;
                let sub = (*nanos % 1_000_000_000) as u32;
                DateTime::from_timestamp(secs, sub)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiration::AtHeight(height) => write!(f, "at height {}", height),
            Expiration::AtTime(_) => match self.at_time() {
                Some(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%M UTC")),
                None => f.write_str("at an invalid time"),
            },
            Expiration::Never {} => f.write_str("never"),
        }
    }
}

/// A length of time, in blocks or seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    Height(u64),
    Time(u64),
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duration::Height(blocks) => write!(f, "{} blocks", blocks),
            Duration::Time(secs) if secs % 86_400 == 0 => write!(f, "{} days", secs / 86_400),
            Duration::Time(secs) if secs % 3_600 == 0 => write!(f, "{} hours", secs / 3_600),
            Duration::Time(secs) => write!(f, "{} seconds", secs),
        }
    }
}

mod nanos {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map_err(|_| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uint128_string_encoding() {
        let amount: Uint128 = serde_json::from_value(json!("340282366920938463463374607431768211455")).unwrap();
        assert_eq!(amount.u128(), u128::MAX);
        assert_eq!(serde_json::to_value(Uint128::new(42)).unwrap(), json!("42"));
        assert!(serde_json::from_value::<Uint128>(json!("-1")).is_err());
    }

    #[test]
    fn test_expiration_variants() {
        let height: Expiration = serde_json::from_value(json!({"at_height": 100})).unwrap();
        assert_eq!(height, Expiration::AtHeight(100));
        assert_eq!(height.to_string(), "at height 100");

        let time: Expiration =
            serde_json::from_value(json!({"at_time": "1700000000000000000"})).unwrap();
        assert_eq!(time.to_string(), "2023-11-14 22:13 UTC");

        let never: Expiration = serde_json::from_value(json!({"never": {}})).unwrap();
        assert_eq!(never.to_string(), "never");
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::Time(604_800).to_string(), "7 days");
        assert_eq!(Duration::Time(7_200).to_string(), "2 hours");
        assert_eq!(Duration::Time(90).to_string(), "90 seconds");
        assert_eq!(Duration::Height(10).to_string(), "10 blocks");
    }
}
