//! Time and timestamp helpers.
//!
//! The printer service reports connection timestamps either as epoch
//! milliseconds or as ISO-8601 strings, and queue job times as epoch seconds.
//! Everything is normalised to local time because the console only ever
//! shows wall-clock values to the operator.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Local wall-clock timestamp.
pub type Timestamp = DateTime<Local>;

/// Time-of-day format used for the `$TIME$` placeholder and panel footers.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Calendar date format used on the test label.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
/// Combined format used for connection timestamps.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Return the current local time.
#[must_use]
pub fn now() -> Timestamp {
    Local::now()
}

/// Render the time of day (`HH:MM:SS`).
#[must_use]
pub fn format_time(ts: &Timestamp) -> String {
    ts.format(TIME_FORMAT).to_string()
}

/// Render the calendar date (`DD.MM.YYYY`).
#[must_use]
pub fn format_date(ts: &Timestamp) -> String {
    ts.format(DATE_FORMAT).to_string()
}

/// Render date and time (`DD.MM.YYYY, HH:MM:SS`).
#[must_use]
pub fn format_date_time(ts: &Timestamp) -> String {
    ts.format(DATE_TIME_FORMAT).to_string()
}

/// Convert epoch milliseconds to a local timestamp.
#[must_use]
pub fn from_epoch_millis(millis: i64) -> Option<Timestamp> {
    Local.timestamp_millis_opt(millis).single()
}

/// Convert fractional epoch seconds (as used by queue jobs) to a local timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn from_epoch_seconds(seconds: f64) -> Option<Timestamp> {
    if !seconds.is_finite() {
        return None;
    }
    from_epoch_millis((seconds * 1000.0).round() as i64)
}

/// Timestamp as reported by the printer service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimestamp(Timestamp);

impl ServerTimestamp {
    /// Access the inner timestamp.
    #[must_use]
    pub fn as_local(&self) -> &Timestamp {
        &self.0
    }

    /// Parse the textual form: RFC 3339 with an offset, or a naive
    /// ISO-8601 date-time interpreted as local time.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(Self(ts.with_timezone(&Local)));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(Self)
    }
}

impl std::fmt::Display for ServerTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_date_time(&self.0))
    }
}

/// Wire shape accepted for a [`ServerTimestamp`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ServerTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(millis) => from_epoch_millis(millis).map(Self),
            RawTimestamp::FractionalMillis(millis) => {
                from_epoch_seconds(millis / 1000.0).map(Self)
            }
            RawTimestamp::Text(text) => Self::parse(&text),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("invalid server timestamp"))
    }
}

impl Serialize for ServerTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0.timestamp_millis())
    }
}
