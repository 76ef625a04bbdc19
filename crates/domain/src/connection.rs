//! Connection status: the printer link state reported by `/api/status`.

use serde::{Deserialize, Serialize};

use crate::time::ServerTimestamp;

/// Link state of the printer as reported by the service.
///
/// Values the console does not know about are kept verbatim in
/// [`Unknown`](Self::Unknown) and presented like
/// [`Disconnected`](Self::Disconnected).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Reconnecting,
    #[default]
    Disconnected,
    Failed,
    Unknown(String),
}

/// Fixed icon/label/CSS-state triple used to render a [`ConnectionStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub icon: &'static str,
    pub label: &'static str,
    pub css_class: &'static str,
}

const CONNECTED: StatusPresentation = StatusPresentation {
    icon: "\u{2705}",
    label: "Verbunden",
    css_class: "status-connected",
};
const CONNECTING: StatusPresentation = StatusPresentation {
    icon: "\u{1F504}",
    label: "Verbinde...",
    css_class: "status-connecting",
};
const RECONNECTING: StatusPresentation = StatusPresentation {
    icon: "\u{1F503}",
    label: "Reconnecting...",
    css_class: "status-connecting",
};
const DISCONNECTED: StatusPresentation = StatusPresentation {
    icon: "\u{274C}",
    label: "Getrennt",
    css_class: "status-disconnected",
};
const FAILED: StatusPresentation = StatusPresentation {
    icon: "\u{1F480}",
    label: "Fehlgeschlagen",
    css_class: "status-failed",
};

impl ConnectionStatus {
    /// Presentation triple for this status.
    #[must_use]
    pub fn presentation(&self) -> StatusPresentation {
        match self {
            Self::Connected => CONNECTED,
            Self::Connecting => CONNECTING,
            Self::Reconnecting => RECONNECTING,
            Self::Disconnected | Self::Unknown(_) => DISCONNECTED,
            Self::Failed => FAILED,
        }
    }

    /// Wire name of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => "connected",
            Self::Connecting => "connecting",
            Self::Reconnecting => "reconnecting",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ConnectionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "connected" => Self::Connected,
            "connecting" => Self::Connecting,
            "reconnecting" => Self::Reconnecting,
            "disconnected" => Self::Disconnected,
            "failed" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ConnectionStatus> for String {
    fn from(value: ConnectionStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative job counters owned by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_jobs: u64,
    pub successful_jobs: u64,
    pub failed_jobs: u64,
}

/// Decoded body of `GET /api/status`.
///
/// Every field is optional on the wire: when the service cannot read its own
/// state it answers with just `connected` and `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub connected: bool,
    pub mac: Option<String>,
    pub device: Option<String>,
    pub connection_attempts: u32,
    pub last_successful: Option<ServerTimestamp>,
    pub last_heartbeat: Option<ServerTimestamp>,
    pub rfcomm_process_running: bool,
    pub queue_size: u64,
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
