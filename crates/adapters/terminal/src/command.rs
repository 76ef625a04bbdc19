//! Operator command parsing.

use std::str::FromStr;

use labeldeck_domain::calibration::CalibrationMode;
use labeldeck_domain::error::ValidationError;

/// Usage shown by `help`.
pub const HELP: &str = "\
Befehle:
  status               Status neu laden
  queue                Queue neu laden
  info                 Kalibrierungs-Info neu laden
  reconnect            Force Reconnect
  connect              Manual Bluetooth Connect
  clear                Queue leeren (mit Rückfrage)
  print [text]         Text sofort drucken
  enqueue [text]       Text zur Queue hinzufügen
  text <text>          Drucktext setzen (\\n = neue Zeile, $TIME$ = Uhrzeit)
  font <px>            Schriftgröße (14, 18, 22, 26, 30)
  offset <x> <y>       Kalibrierungs-Offsets (-20..=20)
  thickness <px>       Rahmenstärke (1..=5)
  test-label           Test-Label drucken
  test-connection      Bluetooth-Verbindung testen
  init                 Drucker initialisieren
  heartbeat            Heartbeat senden
  calibrate <mode>     border | grid | rulers | corners | series
  hide / show          Polling pausieren / fortsetzen
  help                 Diese Hilfe
  quit                 Beenden";

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Queue,
    Info,
    Reconnect,
    Connect,
    Clear,
    /// Print immediately, optionally replacing the form text first.
    Print(Option<String>),
    /// Print through the queue, optionally replacing the form text first.
    Enqueue(Option<String>),
    Text(String),
    Font(u32),
    Offset(i32, i32),
    Thickness(u32),
    TestLabel,
    TestConnection,
    Init,
    Heartbeat,
    Calibrate(CalibrationMode),
    Hide,
    Show,
    Help,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{0:?} is not a number")]
    InvalidNumber(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Turn the two-character sequence `\n` into a newline.
#[must_use]
pub fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn number<T: FromStr>(raw: &str) -> Result<T, ParseError> {
    raw.parse()
        .map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

fn optional_text(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| unescape(rest))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(head, rest)| (head, rest.trim()));

        let command = match head.to_ascii_lowercase().as_str() {
            "status" => Self::Status,
            "queue" => Self::Queue,
            "info" => Self::Info,
            "reconnect" => Self::Reconnect,
            "connect" => Self::Connect,
            "clear" => Self::Clear,
            "print" => Self::Print(optional_text(rest)),
            "enqueue" => Self::Enqueue(optional_text(rest)),
            "text" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "text",
                        expected: "the text to print",
                    });
                }
                Self::Text(unescape(rest))
            }
            "font" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "font",
                        expected: "a size in pixels",
                    });
                }
                Self::Font(number(rest)?)
            }
            "offset" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(x), Some(y), None) => Self::Offset(number(x)?, number(y)?),
                    _ => {
                        return Err(ParseError::MissingArgument {
                            command: "offset",
                            expected: "two numbers <x> <y>",
                        });
                    }
                }
            }
            "thickness" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "thickness",
                        expected: "a thickness in pixels",
                    });
                }
                Self::Thickness(number(rest)?)
            }
            "test-label" => Self::TestLabel,
            "test-connection" => Self::TestConnection,
            "init" => Self::Init,
            "heartbeat" => Self::Heartbeat,
            "calibrate" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "calibrate",
                        expected: "a mode (border, grid, rulers, corners, series)",
                    });
                }
                Self::Calibrate(rest.parse()?)
            }
            "hide" => Self::Hide,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
