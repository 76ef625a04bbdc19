//! Command outcomes: response bodies of the operator commands.
//!
//! Every outcome carries at least a `success` flag and an optional `error`
//! text. Missing fields decode to their defaults so a bare
//! `{"success": false}` is always accepted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::time::{Timestamp, from_epoch_seconds};

/// Opaque job identifier assigned by the service queue.
///
/// The service sends it as a string, but numeric ids are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobId(String);

impl JobId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawJobId {
    Text(String),
    Number(i64),
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawJobId::deserialize(deserializer)? {
            RawJobId::Text(text) => Self(text),
            RawJobId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Generic outcome of `force-reconnect` and `clear-queue`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Outcome of `manual-connect`, with link diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConnectOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub heartbeat_ok: Option<bool>,
    pub device_exists: Option<bool>,
    pub process_running: Option<bool>,
}

/// Outcome of `print-text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOutcome {
    pub success: bool,
    /// Present when the job went through the queue.
    pub job_id: Option<JobId>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Outcome of `test-connection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionTestOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    /// Round trip in milliseconds.
    pub response_time: Option<u64>,
}

/// Outcome of `init-printer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitOutcome {
    pub success: bool,
    pub job_id: Option<JobId>,
    pub error: Option<String>,
}

/// Outcome of `heartbeat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatOutcome {
    pub success: bool,
    /// Round trip in milliseconds.
    pub response_time: Option<u64>,
    /// Server-side probe time in epoch seconds.
    pub timestamp: Option<f64>,
    pub error: Option<String>,
}

impl HeartbeatOutcome {
    /// Server-side probe time converted to local time.
    #[must_use]
    pub fn probed_at(&self) -> Option<Timestamp> {
        self.timestamp.and_then(from_epoch_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_bare_failure() {
        let outcome: CommandOutcome = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn should_default_missing_success_to_false() {
        let outcome: CommandOutcome = serde_json::from_str("{}").unwrap();
        assert!(!outcome.success);
    }

    #[test]
    fn should_decode_string_job_id() {
        let outcome: PrintOutcome =
            serde_json::from_str(r#"{"success": true, "job_id": "42"}"#).unwrap();
        assert_eq!(outcome.job_id, Some(JobId::new("42")));
    }

    #[test]
    fn should_decode_numeric_job_id() {
        let outcome: PrintOutcome =
            serde_json::from_str(r#"{"success": true, "job_id": 42}"#).unwrap();
        assert_eq!(outcome.job_id.unwrap().as_str(), "42");
    }

    #[test]
    fn should_decode_manual_connect_diagnostics() {
        let outcome: ManualConnectOutcome = serde_json::from_str(
            r#"{"success": false, "error": "rfcomm failed", "device_exists": false, "process_running": true}"#,
        )
        .unwrap();
        assert_eq!(outcome.error.as_deref(), Some("rfcomm failed"));
        assert_eq!(outcome.device_exists, Some(false));
        assert_eq!(outcome.process_running, Some(true));
        assert!(outcome.heartbeat_ok.is_none());
    }

    #[test]
    fn should_convert_heartbeat_probe_time() {
        let outcome: HeartbeatOutcome = serde_json::from_str(
            r#"{"success": true, "response_time": 12, "timestamp": 1700000000.5}"#,
        )
        .unwrap();
        assert_eq!(outcome.response_time, Some(12));
        assert_eq!(
            outcome.probed_at().unwrap().timestamp_millis(),
            1_700_000_000_500
        );
    }
}
