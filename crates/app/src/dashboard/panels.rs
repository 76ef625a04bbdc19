//! Typed panel view models rendered by the driving adapters.
//!
//! Panels hold structured fields only; turning them into text or markup is
//! the renderer's job, so server-supplied strings are never spliced into
//! markup here.

use labeldeck_domain::calibration::{CalibrationInfo, SeriesResult};
use labeldeck_domain::connection::{StatusPresentation, StatusReport};
use labeldeck_domain::queue::{JobSummary, QueueSnapshot};
use labeldeck_domain::time::{ServerTimestamp, Timestamp, format_time};

/// Glyph shown for a passed check.
pub const PASS_GLYPH: &str = "\u{2705}";
/// Glyph shown for a failed check.
pub const FAIL_GLYPH: &str = "\u{274C}";

/// Shown in place of a missing timestamp.
const NEVER: &str = "Never";

/// Overall tone of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// Connection status panel built from a [`StatusReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPanel {
    pub tone: Tone,
    pub presentation: StatusPresentation,
    pub mac: Option<String>,
    pub device: Option<String>,
    pub connection_attempts: u32,
    pub last_successful: Option<ServerTimestamp>,
    pub last_heartbeat: Option<ServerTimestamp>,
    pub rfcomm_process_running: bool,
    pub queue_size: u64,
}

impl ConnectionPanel {
    #[must_use]
    pub fn from_report(report: &StatusReport) -> Self {
        Self {
            tone: if report.connected {
                Tone::Success
            } else {
                Tone::Error
            },
            presentation: report.status.presentation(),
            mac: report.mac.clone(),
            device: report.device.clone(),
            connection_attempts: report.connection_attempts,
            last_successful: report.last_successful,
            last_heartbeat: report.last_heartbeat,
            rfcomm_process_running: report.rfcomm_process_running,
            queue_size: report.queue_size,
        }
    }

    /// Headline such as `✅ Verbunden`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} {}", self.presentation.icon, self.presentation.label)
    }

    #[must_use]
    pub fn rfcomm_label(&self) -> &'static str {
        if self.rfcomm_process_running {
            "\u{2705} Running"
        } else {
            "\u{274C} Stopped"
        }
    }

    #[must_use]
    pub fn last_successful_label(&self) -> String {
        timestamp_label(self.last_successful.as_ref())
    }

    #[must_use]
    pub fn last_heartbeat_label(&self) -> String {
        timestamp_label(self.last_heartbeat.as_ref())
    }
}

fn timestamp_label(ts: Option<&ServerTimestamp>) -> String {
    ts.map_or_else(|| NEVER.to_string(), ToString::to_string)
}

/// Print queue panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueuePanel {
    /// Nothing fetched yet.
    #[default]
    NotLoaded,
    /// Last fetch succeeded.
    Loaded(QueueSnapshot),
    /// Last fetch failed; previous rows are gone.
    Unavailable,
}

impl QueuePanel {
    /// Job rows as `HH:MM:SS - type (status)`, in server order.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        match self {
            Self::Loaded(snapshot) => snapshot.recent_jobs.iter().map(job_row).collect(),
            Self::NotLoaded | Self::Unavailable => Vec::new(),
        }
    }
}

fn job_row(job: &JobSummary) -> String {
    let time = job
        .submitted_at()
        .map_or_else(|| "--:--:--".to_string(), |ts| format_time(&ts));
    format!("{time} - {} ({})", job.job_type, job.status)
}

/// One `label: value` line of a detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

/// Secondary diagnostics panel filled by some commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugPanel {
    pub lines: Vec<DetailLine>,
}

impl DebugPanel {
    #[must_use]
    pub fn line(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.lines.push(DetailLine {
            label,
            value: value.into(),
        });
        self
    }

    /// Value of the first line with `label`.
    #[cfg(test)]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }
}

/// Calibration panel: static printer info or the last calibration result.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationPanel {
    Info(CalibrationInfo),
    Single {
        message: String,
        image_size: Option<String>,
        at: Timestamp,
    },
    Series {
        message: String,
        success: bool,
        results: Vec<SeriesResult>,
    },
    Failed {
        error: Option<String>,
        at: Timestamp,
    },
    NetworkError {
        error: String,
        at: Timestamp,
    },
}

impl CalibrationPanel {
    /// Panel content as display lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Info(info) => vec![
                format!(
                    "Drucker: {}px ({}mm)",
                    info.printer_width_pixels, info.printer_width_mm
                ),
                format!(
                    "Label: {}x{}px ({}x{}mm)",
                    info.label_width_px,
                    info.label_height_px,
                    info.label_width_mm,
                    info.label_height_mm
                ),
                format!("Aufl\u{f6}sung: {:.1} Pixel/mm", info.pixels_per_mm),
                format!("Modi: {}", info.available_modes.join(", ")),
            ],
            Self::Single {
                message,
                image_size,
                at,
            } => vec![
                format!("Letzter Test: {message}"),
                format!("Bildgr\u{f6}\u{df}e: {}", image_size.as_deref().unwrap_or("-")),
                format!("Timestamp: {}", format_time(at)),
            ],
            Self::Series {
                message,
                success,
                results,
            } => {
                let header = if *success {
                    format!("{PASS_GLYPH} {message} abgeschlossen!")
                } else {
                    format!("{FAIL_GLYPH} {message} fehlgeschlagen!")
                };
                let mut lines = vec![header];
                lines.extend(results.iter().map(series_line));
                lines
            }
            Self::Failed { error, at } => vec![
                format!("Fehler: {}", error.as_deref().unwrap_or("-")),
                format!("Timestamp: {}", format_time(at)),
            ],
            Self::NetworkError { error, at } => vec![
                format!("Netzwerk-Fehler: {error}"),
                format!("Timestamp: {}", format_time(at)),
            ],
        }
    }
}

/// `✅ Test 1: description` (or `❌` when that print failed).
#[must_use]
pub fn series_line(result: &SeriesResult) -> String {
    let glyph = if result.success {
        PASS_GLYPH
    } else {
        FAIL_GLYPH
    };
    format!(
        "{glyph} Test {}: {}",
        result.test_number, result.description
    )
}
