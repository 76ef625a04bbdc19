//! Print requests: text labels submitted to `/api/print-text`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{Timestamp, format_date, format_time};

/// Token replaced by the current time of day before submission.
pub const TIME_PLACEHOLDER: &str = "$TIME$";

/// Text prefilled in the print form.
pub const DEFAULT_TEXT: &str = "PHOMEMO M110\nRobust Connection\n\u{2713} Auto-Reconnect\nZeit: $TIME$";

/// Last line of the test label.
pub const TEST_LABEL_FOOTER: &str = "\u{2713} Test erfolgreich";

/// Font size presets offered by the print form, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FontSize(u32);

impl FontSize {
    /// Supported presets, smallest first.
    pub const PRESETS: [u32; 5] = [14, 18, 22, 26, 30];

    #[must_use]
    pub fn pixels(self) -> u32 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(22)
    }
}

impl TryFrom<u32> for FontSize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::PRESETS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::FontSize(value))
        }
    }
}

impl From<FontSize> for u32 {
    fn from(value: FontSize) -> Self {
        value.0
    }
}

/// Whether a print goes straight to the printer or through the service queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Immediate,
    Queued,
}

impl PrintMode {
    #[must_use]
    pub fn use_queue(self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Replace every occurrence of [`TIME_PLACEHOLDER`] with `time_of_day`.
#[must_use]
pub fn substitute_time(text: &str, time_of_day: &str) -> String {
    text.replace(TIME_PLACEHOLDER, time_of_day)
}

/// A validated text print request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRequest {
    text: String,
    font_size: FontSize,
    mode: PrintMode,
}

impl PrintRequest {
    /// Build a request from raw form input, substituting the time placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] when `text` is empty or only
    /// whitespace.
    pub fn new(
        text: &str,
        font_size: FontSize,
        mode: PrintMode,
        now: &Timestamp,
    ) -> Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(Self {
            text: substitute_time(text, &format_time(now)),
            font_size,
            mode,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    #[must_use]
    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// Form fields to submit.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("font_size", self.font_size.pixels().to_string()),
            ("use_queue", self.mode.use_queue().to_string()),
        ]
    }
}

/// Fixed template printed by the "test label" shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLabel {
    /// Device name line.
    pub title: String,
    /// Mode label line.
    pub subtitle: String,
}

impl Default for TestLabel {
    fn default() -> Self {
        Self {
            title: "PHOMEMO M110".to_string(),
            subtitle: "Robust Server".to_string(),
        }
    }
}

impl TestLabel {
    /// Render the five label lines joined by newlines.
    #[must_use]
    pub fn render(&self, now: &Timestamp) -> String {
        [
            self.title.clone(),
            self.subtitle.clone(),
            format_date(now),
            format_time(now),
            TEST_LABEL_FOOTER.to_string(),
        ]
        .join("\n")
    }
}
