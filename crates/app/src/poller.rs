//! Poller: recurring status refresh with a visibility state machine.
//!
//! ```text
//!            hide
//!   Active ────────▶ Paused
//!     ▲                │
//!     └────────────────┘
//!      show (+ immediate refresh)
//! ```
//!
//! The interval is constant: no backoff or jitter after failures. Every tick
//! spawns its own refresh, so a slow response never delays the next tick.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::ports::PrinterApi;
use crate::refresher::Refresher;

/// Default period between two status refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Whether the recurring timer is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Active,
    Paused,
}

/// Owns the recurring timer task. Dropping the poller stops it.
pub struct Poller<A> {
    refresher: Refresher<A>,
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl<A: PrinterApi + 'static> Poller<A> {
    /// Create a paused poller refreshing every `interval`.
    #[must_use]
    pub fn new(refresher: Refresher<A>, interval: Duration) -> Self {
        Self {
            refresher,
            interval,
            timer: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        if self.timer.is_some() {
            PollerState::Active
        } else {
            PollerState::Paused
        }
    }

    /// Initial load: one status, queue and calibration-info refresh each,
    /// then start the recurring cycle.
    pub fn startup(&mut self) {
        tracing::info!(interval_ms = self.interval.as_millis(), "poller startup");
        let refresher = self.refresher.clone();
        tokio::spawn(async move { refresher.refresh_status().await });
        let refresher = self.refresher.clone();
        tokio::spawn(async move { refresher.refresh_queue().await });
        let refresher = self.refresher.clone();
        tokio::spawn(async move { refresher.refresh_calibration_info().await });
        self.start();
    }

    /// Start the recurring timer. The first tick fires one interval from now.
    /// No-op when already active.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        let refresher = self.refresher.clone();
        let period = self.interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let refresher = refresher.clone();
                tokio::spawn(async move { refresher.refresh_status().await });
            }
        }));
        tracing::debug!("poll timer started");
    }

    /// Clear the recurring timer. Refreshes already in flight still land.
    pub fn stop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
            tracing::debug!("poll timer stopped");
        }
    }

    /// Apply a visibility edge.
    ///
    /// Hiding pauses the timer. Showing a paused poller refreshes once right
    /// away and restarts the timer; showing an active one does nothing.
    pub fn set_visible(&mut self, visible: bool) {
        match (visible, self.state()) {
            (false, PollerState::Active) => {
                tracing::info!("view hidden, pausing poller");
                self.stop();
            }
            (true, PollerState::Paused) => {
                tracing::info!("view shown, resuming poller");
                let refresher = self.refresher.clone();
                tokio::spawn(async move { refresher.refresh_status().await });
                self.start();
            }
            _ => {}
        }
    }
}

impl<A> Drop for Poller<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}
