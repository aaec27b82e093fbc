//! UTC instants recorded on decisions and fitted artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable point in time, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn now_is_monotonic_enough_for_ordering() {
        let first = Timestamp::now();
        let second = Timestamp::now();
        assert!(first <= second);
    }

    #[test]
    fn parses_rfc3339_from_audit_logs() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();

        assert_eq!(ts.as_datetime().year(), 2024);
        assert!(ts.to_string().starts_with("2024-01-15T10:30:00"));
    }
}
