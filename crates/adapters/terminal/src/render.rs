//! Plain-text rendering of the dashboard view model.
//!
//! Server-supplied strings are stripped of control characters before they
//! reach the terminal, so a device name or error text cannot inject escape
//! sequences.

use std::fmt::Write as _;
use std::io::Write as _;

use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use labeldeck_app::dashboard::{
    BannerKind, CalibrationPanel, ConnectionPanel, DashboardState, DebugPanel, QueuePanel, Tone,
};
use labeldeck_domain::connection::Stats;

fn clean(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn opt(value: Option<&String>) -> String {
    value.map_or_else(|| "-".to_string(), |v| clean(v))
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\u{2500}\u{2500} {title} \u{2500}\u{2500}");
}

fn connection(out: &mut String, panel: Option<&ConnectionPanel>) {
    heading(out, "Verbindung");
    let Some(panel) = panel else {
        let _ = writeln!(out, "Lade Status...");
        return;
    };
    let tone = match panel.tone {
        Tone::Success => "ok",
        Tone::Error => "error",
    };
    let _ = writeln!(
        out,
        "{} [{tone}, {}]",
        panel.headline(),
        panel.presentation.css_class
    );
    let _ = writeln!(out, "MAC: {}", opt(panel.mac.as_ref()));
    let _ = writeln!(out, "Device: {}", opt(panel.device.as_ref()));
    let _ = writeln!(out, "Connection Attempts: {}", panel.connection_attempts);
    let _ = writeln!(out, "Last Success: {}", panel.last_successful_label());
    let _ = writeln!(out, "Last Heartbeat: {}", panel.last_heartbeat_label());
    let _ = writeln!(out, "RFCOMM Process: {}", panel.rfcomm_label());
    let _ = writeln!(out, "Queue Size: {}", panel.queue_size);
}

fn stats(out: &mut String, stats: Option<&Stats>) {
    heading(out, "Statistik");
    match stats {
        Some(stats) => {
            let _ = writeln!(
                out,
                "Jobs: {} gesamt, {} erfolgreich, {} fehlgeschlagen",
                stats.total_jobs, stats.successful_jobs, stats.failed_jobs
            );
        }
        None => {
            let _ = writeln!(out, "-");
        }
    }
}

fn queue(out: &mut String, panel: &QueuePanel) {
    heading(out, "Queue");
    match panel {
        QueuePanel::NotLoaded => {
            let _ = writeln!(out, "Lade Queue...");
        }
        QueuePanel::Unavailable => {
            let _ = writeln!(out, "Error loading queue status");
        }
        QueuePanel::Loaded(snapshot) => {
            let _ = writeln!(out, "Queue Size: {}", snapshot.size);
            let _ = writeln!(out, "Processor Running: {}", snapshot.running);
            let rows = panel.rows();
            if rows.is_empty() {
                let _ = writeln!(out, "No recent jobs");
            } else {
                let _ = writeln!(out, "Recent Jobs:");
                for row in rows {
                    let _ = writeln!(out, "  {}", clean(&row));
                }
            }
        }
    }
}

fn debug(out: &mut String, panel: &DebugPanel) {
    heading(out, "Debug");
    for line in &panel.lines {
        let _ = writeln!(out, "{}: {}", line.label, clean(&line.value));
    }
}

fn calibration(out: &mut String, panel: &CalibrationPanel) {
    heading(out, "Kalibrierung");
    for line in panel.lines() {
        let _ = writeln!(out, "{}", clean(&line));
    }
}

/// Render the whole dashboard as text, banner first.
#[must_use]
pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    if let Some(banner) = &state.banner {
        let kind = match banner.kind {
            BannerKind::Info => "info",
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        };
        let _ = writeln!(out, "[{kind}] {}", clean(&banner.text));
    }
    connection(&mut out, state.connection.as_ref());
    stats(&mut out, state.stats.as_ref());
    queue(&mut out, &state.queue);
    if let Some(panel) = &state.debug {
        debug(&mut out, panel);
    }
    if let Some(panel) = &state.calibration {
        calibration(&mut out, panel);
    }

    let form = &state.form;
    heading(&mut out, "Formular");
    let _ = writeln!(out, "Text: {}", form.text.replace('\n', "\\n"));
    let _ = writeln!(
        out,
        "Schrift: {}px | Offset: {}/{} | Rahmen: {}px",
        form.font_size.pixels(),
        form.calibration.offset_x(),
        form.calibration.offset_y(),
        form.calibration.border_thickness()
    );
    out
}

/// Redraw on every dashboard change until the dashboard is dropped.
pub async fn run(state: watch::Receiver<DashboardState>) {
    let mut changes = WatchStream::new(state);
    while let Some(state) = changes.next().await {
        let frame = render(&state);
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "\n{frame}").and_then(|()| stdout.flush()) {
            tracing::warn!(error = %err, "cannot draw dashboard");
            break;
        }
    }
    tracing::debug!("renderer stopped");
}
