//! Command dispatcher: operator commands against the printer service.
//!
//! Every command follows the same shape: an "in progress" banner, one
//! request, then a success or error banner. Commands that change device or
//! queue state schedule a follow-up status refresh so the operator sees the
//! settled state before the next periodic tick. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use labeldeck_domain::calibration::{CalibrationMode, CalibrationOutcome, CalibrationRequest};
use labeldeck_domain::error::DashboardError;
use labeldeck_domain::print::{PrintMode, PrintRequest, TestLabel};
use labeldeck_domain::time::format_time;

use crate::dashboard::{CalibrationPanel, Dashboard, DebugPanel};
use crate::ports::{Clock, Confirm, PrinterApi};
use crate::refresher::Refresher;

/// Question asked before the queue is cleared.
pub const CLEAR_QUEUE_PROMPT: &str = "Alle Jobs in der Queue l\u{f6}schen?";

const UNKNOWN_ERROR: &str = "Unbekannter Fehler";

/// Tunables of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Delay before the follow-up refresh after reconnect commands.
    pub follow_up_delay: Duration,
    /// Delay before the follow-up refresh after a print.
    pub print_follow_up_delay: Duration,
    /// Template printed by [`CommandDispatcher::test_label`].
    pub test_label: TestLabel,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            follow_up_delay: Duration::from_millis(1_000),
            print_follow_up_delay: Duration::from_millis(500),
            test_label: TestLabel::default(),
        }
    }
}

/// `❌ <prefix>: <error>` with a generic fallback.
fn failure(prefix: &str, error: Option<&str>) -> String {
    format!("\u{274C} {prefix}: {}", error.unwrap_or(UNKNOWN_ERROR))
}

fn unknown(flag: Option<bool>) -> String {
    flag.map_or_else(|| "unknown".to_string(), |b| b.to_string())
}

/// Write-side use-cases: one method per operator command.
pub struct CommandDispatcher<A, C> {
    api: Arc<A>,
    refresher: Refresher<A>,
    clock: C,
    config: DispatcherConfig,
}

impl<A: PrinterApi + 'static, C: Clock> CommandDispatcher<A, C> {
    /// Create a dispatcher sharing `refresher`'s API client and dashboard.
    pub fn new(refresher: Refresher<A>, clock: C, config: DispatcherConfig) -> Self {
        Self {
            api: Arc::clone(refresher.api()),
            refresher,
            clock,
            config,
        }
    }

    #[must_use]
    pub fn refresher(&self) -> &Refresher<A> {
        &self.refresher
    }

    fn dashboard(&self) -> &Dashboard {
        self.refresher.dashboard()
    }

    fn now_label(&self) -> String {
        format_time(&self.clock.now())
    }

    fn schedule_refresh(&self, delay: Duration) {
        let refresher = self.refresher.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            refresher.refresh_status().await;
        });
    }

    fn transport_failure(&self, prefix: &str, err: &DashboardError) {
        tracing::warn!(error = %err, "{prefix}");
        self.dashboard()
            .error(format!("\u{274C} {prefix}: {err}"));
    }

    /// `POST /api/force-reconnect`, then refresh after the follow-up delay.
    #[tracing::instrument(skip(self))]
    pub async fn force_reconnect(&self) {
        self.dashboard().info("\u{1F504} Force Reconnect...");
        match self.api.force_reconnect().await {
            Ok(outcome) if outcome.success => {
                self.dashboard().success("\u{2705} Reconnect erfolgreich!");
                self.schedule_refresh(self.config.follow_up_delay);
            }
            Ok(outcome) => self.dashboard().error(failure(
                "Reconnect fehlgeschlagen",
                outcome.error.as_deref(),
            )),
            Err(err) => self.transport_failure("Fehler", &err),
        }
    }

    /// `POST /api/manual-connect`; fills the debug panel with the link
    /// diagnostics of the answer.
    #[tracing::instrument(skip(self))]
    pub async fn manual_connect(&self) {
        self.dashboard().info("\u{1F527} Manual Bluetooth Connect...");
        match self.api.manual_connect().await {
            Ok(outcome) if outcome.success => {
                let heartbeat = if outcome.heartbeat_ok == Some(true) {
                    "OK"
                } else {
                    "FAILED"
                };
                let debug = DebugPanel::default()
                    .line("Manual Connect", "SUCCESS")
                    .line("Heartbeat", heartbeat)
                    .line("Device Exists", unknown(outcome.device_exists))
                    .line("Process Running", unknown(outcome.process_running))
                    .line("Timestamp", self.now_label());
                self.dashboard().update(|state| state.debug = Some(debug));
                self.dashboard()
                    .success("\u{2705} Manual connect erfolgreich!");
                self.schedule_refresh(self.config.follow_up_delay);
            }
            Ok(outcome) => {
                let debug = DebugPanel::default()
                    .line("Manual Connect", "FAILED")
                    .line("Error", outcome.error.as_deref().unwrap_or(UNKNOWN_ERROR))
                    .line("Device Exists", unknown(outcome.device_exists))
                    .line("Process Running", unknown(outcome.process_running))
                    .line("Timestamp", self.now_label());
                self.dashboard().update(|state| state.debug = Some(debug));
                self.dashboard().error(failure(
                    "Manual connect fehlgeschlagen",
                    outcome.error.as_deref(),
                ));
            }
            Err(err) => self.transport_failure("Manual connect error", &err),
        }
    }

    /// Ask for confirmation, then clear the queue as
    /// [`clear_queue_confirmed`](Self::clear_queue_confirmed) does.
    ///
    /// Declining sends nothing and shows nothing.
    pub async fn clear_queue(&self, confirm: &impl Confirm) {
        if self.confirm_clear_queue(confirm).await {
            self.clear_queue_confirmed().await;
        }
    }

    /// Ask whether the queue may be cleared.
    pub async fn confirm_clear_queue(&self, confirm: &impl Confirm) -> bool {
        let accepted = confirm.confirm(CLEAR_QUEUE_PROMPT).await;
        if !accepted {
            tracing::debug!("clear queue declined");
        }
        accepted
    }

    /// `POST /api/clear-queue`, then reload the status and queue panels
    /// before returning.
    #[tracing::instrument(skip(self))]
    pub async fn clear_queue_confirmed(&self) {
        self.dashboard().info("\u{1F5D1}\u{FE0F} Leere Queue...");
        match self.api.clear_queue().await {
            Ok(outcome) if outcome.success => {
                self.dashboard().success("\u{1F5D1}\u{FE0F} Queue geleert");
                self.refresher.refresh_status().await;
                self.refresher.refresh_queue().await;
            }
            Ok(outcome) => self.dashboard().error(failure(
                "Queue leeren fehlgeschlagen",
                outcome.error.as_deref(),
            )),
            Err(err) => self.transport_failure("Fehler", &err),
        }
    }

    /// Print the form text, immediately or through the service queue.
    ///
    /// `$TIME$` is replaced by the current time of day. Empty text is
    /// rejected without a request.
    #[tracing::instrument(skip(self))]
    pub async fn print_text(&self, mode: PrintMode) {
        let (text, font_size) = self
            .dashboard()
            .read(|state| (state.form.text.clone(), state.form.font_size));
        let request = match PrintRequest::new(&text, font_size, mode, &self.clock.now()) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "print rejected");
                self.dashboard().error("\u{274C} Bitte Text eingeben!");
                return;
            }
        };

        let action = match mode {
            PrintMode::Queued => "zur Queue hinzuf\u{fc}gen",
            PrintMode::Immediate => "drucken",
        };
        self.dashboard().info(format!("\u{1F5A8}\u{FE0F} {action}..."));

        match self.api.print_text(&request).await {
            Ok(outcome) if outcome.success => {
                let message = match (mode, outcome.job_id) {
                    (PrintMode::Queued, Some(job_id)) => {
                        format!("\u{2705} Job {job_id} zur Queue hinzugef\u{fc}gt!")
                    }
                    (PrintMode::Queued, None) => {
                        "\u{2705} Job zur Queue hinzugef\u{fc}gt!".to_string()
                    }
                    (PrintMode::Immediate, _) => "\u{2705} Text gedruckt!".to_string(),
                };
                self.dashboard().success(message);
                self.schedule_refresh(self.config.print_follow_up_delay);
            }
            Ok(outcome) => self
                .dashboard()
                .error(failure("Fehler", outcome.error.as_deref())),
            Err(err) => self.transport_failure("Fehler", &err),
        }
    }

    /// Fill the form with the test label template and print it immediately.
    #[tracing::instrument(skip(self))]
    pub async fn test_label(&self) {
        let text = self.config.test_label.render(&self.clock.now());
        self.dashboard().set_text(text);
        self.print_text(PrintMode::Immediate).await;
    }

    /// `POST /api/test-connection`; the debug panel is filled whatever the
    /// outcome.
    #[tracing::instrument(skip(self))]
    pub async fn test_connection(&self) {
        self.dashboard()
            .info("\u{1F527} Teste Bluetooth-Verbindung...");
        match self.api.test_connection().await {
            Ok(outcome) => {
                let response_time = outcome
                    .response_time
                    .map_or_else(|| "N/A".to_string(), |ms| format!("{ms}ms"));
                let debug = DebugPanel::default()
                    .line("Test Result", outcome.success.to_string())
                    .line("Message", outcome.message.clone().unwrap_or_default())
                    .line("Error", outcome.error.as_deref().unwrap_or("None"))
                    .line("Response Time", response_time)
                    .line("Timestamp", self.now_label());
                self.dashboard().update(|state| state.debug = Some(debug));
                if outcome.success {
                    self.dashboard()
                        .success("\u{2705} Bluetooth-Test erfolgreich!");
                } else {
                    self.dashboard().error(failure(
                        "Bluetooth-Test fehlgeschlagen",
                        outcome.error.as_deref(),
                    ));
                }
            }
            Err(err) => self.transport_failure("Test-Fehler", &err),
        }
    }

    /// `POST /api/init-printer`.
    #[tracing::instrument(skip(self))]
    pub async fn init_printer(&self) {
        self.dashboard().info("\u{1F504} Initialisiere Drucker...");
        match self.api.init_printer().await {
            Ok(outcome) if outcome.success => {
                let message = match outcome.job_id {
                    Some(job_id) => format!("\u{2705} Drucker initialisiert! (Job {job_id})"),
                    None => "\u{2705} Drucker initialisiert!".to_string(),
                };
                self.dashboard().success(message);
            }
            Ok(outcome) => self
                .dashboard()
                .error(failure("Init fehlgeschlagen", outcome.error.as_deref())),
            Err(err) => self.transport_failure("Init-Fehler", &err),
        }
    }

    /// `POST /api/heartbeat`.
    #[tracing::instrument(skip(self))]
    pub async fn heartbeat(&self) {
        self.dashboard().info("\u{1F493} Sende Heartbeat...");
        match self.api.heartbeat().await {
            Ok(outcome) if outcome.success => {
                let response_time = outcome
                    .response_time
                    .map_or_else(|| "N/A".to_string(), |ms| format!("{ms}ms"));
                let mut debug = DebugPanel::default()
                    .line("Heartbeat", "OK")
                    .line("Response Time", response_time);
                if let Some(probed_at) = outcome.probed_at() {
                    debug = debug.line("Server Time", format_time(&probed_at));
                }
                let debug = debug.line("Timestamp", self.now_label());
                self.dashboard().update(|state| state.debug = Some(debug));
                self.dashboard().success("\u{2705} Heartbeat OK!");
            }
            Ok(outcome) => self.dashboard().error(failure(
                "Heartbeat fehlgeschlagen",
                outcome.error.as_deref(),
            )),
            Err(err) => self.transport_failure("Heartbeat-Fehler", &err),
        }
    }

    /// Print a calibration pattern with the form's offsets.
    #[tracing::instrument(skip(self))]
    pub async fn calibrate(&self, mode: CalibrationMode) {
        let settings = self.dashboard().read(|state| state.form.calibration);
        let request = CalibrationRequest::new(mode, settings);
        self.dashboard()
            .info(format!("\u{1F4D0} Drucke {}...", mode.label()));

        match self.api.calibrate(&request).await {
            Ok(outcome) => self.apply_calibration(mode, outcome),
            Err(err) => {
                let panel = CalibrationPanel::NetworkError {
                    error: err.to_string(),
                    at: self.clock.now(),
                };
                self.dashboard()
                    .update(|state| state.calibration = Some(panel));
                self.transport_failure("Kalibrierungs-Fehler", &err);
            }
        }
    }

    fn apply_calibration(&self, mode: CalibrationMode, outcome: CalibrationOutcome) {
        let message = outcome
            .message
            .unwrap_or_else(|| mode.label().to_string());
        let is_series = mode == CalibrationMode::Series;

        let panel = if is_series && (outcome.success || !outcome.results.is_empty()) {
            CalibrationPanel::Series {
                message: message.clone(),
                success: outcome.success,
                results: outcome.results,
            }
        } else if outcome.success {
            CalibrationPanel::Single {
                message: message.clone(),
                image_size: outcome.image_size,
                at: self.clock.now(),
            }
        } else {
            CalibrationPanel::Failed {
                error: outcome.error.clone(),
                at: self.clock.now(),
            }
        };
        self.dashboard()
            .update(|state| state.calibration = Some(panel));

        if !outcome.success {
            self.dashboard().error(failure(
                "Kalibrierung fehlgeschlagen",
                outcome.error.as_deref(),
            ));
        } else if is_series {
            self.dashboard()
                .success(format!("\u{2705} {message} erfolgreich!"));
        } else {
            self.dashboard()
                .success(format!("\u{2705} {message} gedruckt!"));
        }
    }
}
