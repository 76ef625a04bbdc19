//! Refresher: fetches status, queue and calibration info into the dashboard.
//!
//! Status and queue fetches are tagged with a sequence number taken when the
//! request is issued. A response is applied only if no newer response of the
//! same kind has been applied already, so an overlapping periodic poll and a
//! follow-up refresh can never roll the panels back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use labeldeck_domain::connection::StatusReport;

use crate::dashboard::{CalibrationPanel, ConnectionPanel, Dashboard, QueuePanel};
use crate::ports::PrinterApi;

/// Monotonic issue/apply counters for one kind of fetch.
#[derive(Debug, Default)]
struct SequenceGuard {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SequenceGuard {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mark `seq` as applied. Returns `false` when a newer one already was.
    fn try_apply(&self, seq: u64) -> bool {
        self.applied.fetch_max(seq, Ordering::SeqCst) < seq
    }
}

/// Read-side use-cases: keep the status, queue and info panels current.
pub struct Refresher<A> {
    api: Arc<A>,
    dashboard: Dashboard,
    status_seq: Arc<SequenceGuard>,
    queue_seq: Arc<SequenceGuard>,
}

impl<A> Clone for Refresher<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            dashboard: self.dashboard.clone(),
            status_seq: Arc::clone(&self.status_seq),
            queue_seq: Arc::clone(&self.queue_seq),
        }
    }
}

impl<A: PrinterApi> Refresher<A> {
    /// Create a refresher writing into `dashboard`.
    pub fn new(api: Arc<A>, dashboard: Dashboard) -> Self {
        Self {
            api,
            dashboard,
            status_seq: Arc::default(),
            queue_seq: Arc::default(),
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub(crate) fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Fetch `/api/status` and update the connection and stats panels together.
    ///
    /// On failure an error banner is shown and both panels keep their
    /// previous content.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_status(&self) {
        let seq = self.status_seq.issue();
        match self.api.status().await {
            Ok(report) => {
                if !self.status_seq.try_apply(seq) {
                    tracing::debug!(seq, "discarding stale status response");
                    return;
                }
                self.apply_status(report);
            }
            Err(err) => {
                tracing::warn!(error = %err, "status refresh failed");
                self.dashboard.error(format!("\u{274C} Fehler: {err}"));
            }
        }
    }

    fn apply_status(&self, report: StatusReport) {
        let panel = ConnectionPanel::from_report(&report);
        self.dashboard.update(|state| {
            state.connection = Some(panel);
            if let Some(stats) = report.stats {
                state.stats = Some(stats);
            }
        });
        if let Some(error) = report.error {
            tracing::warn!(%error, "service reported a status error");
            self.dashboard
                .error(format!("\u{274C} Status-Fehler: {error}"));
        }
    }

    /// Fetch `/api/queue-status` into the queue panel.
    ///
    /// On failure the panel is replaced by the unavailable marker.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_queue(&self) {
        let seq = self.queue_seq.issue();
        let panel = match self.api.queue_status().await {
            Ok(snapshot) => QueuePanel::Loaded(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "queue refresh failed");
                QueuePanel::Unavailable
            }
        };
        if !self.queue_seq.try_apply(seq) {
            tracing::debug!(seq, "discarding stale queue response");
            return;
        }
        self.dashboard.update(|state| state.queue = panel);
    }

    /// Fetch `/api/calibration/info` into the calibration panel.
    ///
    /// Best effort: failures leave the panel alone and are only logged.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_calibration_info(&self) {
        match self.api.calibration_info().await {
            Ok(info) => self
                .dashboard
                .update(|state| state.calibration = Some(CalibrationPanel::Info(info))),
            Err(err) => tracing::debug!(error = %err, "calibration info unavailable"),
        }
    }
}
