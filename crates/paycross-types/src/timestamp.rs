//! Unix timestamp type and the API-key request-signing freshness window.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord)]
pub struct UnixTimestamp(pub u64);

impl UnixTimestamp {
    pub fn try_now() -> Result<Self, SystemTimeError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        Ok(Self(now))
    }

    pub fn seconds_since_epoch(self) -> u64 {
        self.0
    }

    /// Absolute distance, in seconds, between two timestamps.
    pub fn abs_diff(self, other: UnixTimestamp) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for UnixTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Ok(UnixTimestamp(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_diff_is_symmetric() {
        let a = UnixTimestamp(100);
        let b = UnixTimestamp(450);
        assert_eq!(a.abs_diff(b), 350);
        assert_eq!(b.abs_diff(a), 350);
    }

    #[test]
    fn try_now_returns_a_plausible_timestamp() {
        let now = UnixTimestamp::try_now().unwrap();
        assert!(now.0 > 1_700_000_000);
    }
}
