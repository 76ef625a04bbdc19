//! Queue snapshot: the print queue as reported by `/api/queue-status`.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, from_epoch_seconds};

/// Summary of one recent print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Submission time in epoch seconds.
    pub timestamp: f64,
    pub job_type: String,
    pub status: String,
}

impl JobSummary {
    /// Submission time converted to local time.
    #[must_use]
    pub fn submitted_at(&self) -> Option<Timestamp> {
        from_epoch_seconds(self.timestamp)
    }
}

/// Decoded body of `GET /api/queue-status`.
///
/// `size` is mandatory: the service answers `{error}` alone when it cannot
/// inspect its queue, and that must not be mistaken for an empty queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub size: u64,
    #[serde(default)]
    pub running: bool,
    /// Most recent first.
    #[serde(default)]
    pub recent_jobs: Vec<JobSummary>,
}
