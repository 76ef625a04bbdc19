//! Calibration: backend-rendered test patterns used to verify print alignment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted range for the X/Y calibration offsets, in pixels.
pub const OFFSET_RANGE: std::ops::RangeInclusive<i32> = -20..=20;
/// Accepted range for the border thickness, in pixels.
pub const THICKNESS_RANGE: std::ops::RangeInclusive<u32> = 1..=5;
/// Grid spacing sent with [`CalibrationMode::Grid`].
pub const GRID_SPACING: u32 = 5;
/// Corner mark size sent with [`CalibrationMode::Corners`].
pub const CORNER_SIZE: u32 = 15;
/// Border thickness used when the operator has not chosen one.
pub const DEFAULT_THICKNESS: u32 = 2;

/// One of the five fixed calibration patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationMode {
    Border,
    Grid,
    Rulers,
    Corners,
    Series,
}

impl CalibrationMode {
    /// All modes in display order.
    pub const ALL: [Self; 5] = [
        Self::Border,
        Self::Grid,
        Self::Rulers,
        Self::Corners,
        Self::Series,
    ];

    /// Name used in the endpoint path (`/api/calibration/{name}`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Grid => "grid",
            Self::Rulers => "rulers",
            Self::Corners => "corners",
            Self::Series => "series",
        }
    }

    /// Human label used in progress banners.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Border => "Rahmen-Test",
            Self::Grid => "Gitter-Test",
            Self::Rulers => "Lineal-Test",
            Self::Corners => "Ecken-Test",
            Self::Series => "Offset-Serie",
        }
    }
}

impl FromStr for CalibrationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ValidationError::UnknownCalibrationMode(s.to_string()))
    }
}

impl std::fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator-chosen offsets and border thickness, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSettings {
    offset_x: i32,
    offset_y: i32,
    border_thickness: u32,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            border_thickness: DEFAULT_THICKNESS,
        }
    }
}

impl CalibrationSettings {
    /// Validate and build settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OffsetOutOfRange`] or
    /// [`ValidationError::BorderThickness`] when a value is out of range.
    pub fn new(offset_x: i32, offset_y: i32, border_thickness: u32) -> Result<Self, ValidationError> {
        for offset in [offset_x, offset_y] {
            if !OFFSET_RANGE.contains(&offset) {
                return Err(ValidationError::OffsetOutOfRange(offset));
            }
        }
        if !THICKNESS_RANGE.contains(&border_thickness) {
            return Err(ValidationError::BorderThickness(border_thickness));
        }
        Ok(Self {
            offset_x,
            offset_y,
            border_thickness,
        })
    }

    #[must_use]
    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    #[must_use]
    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    #[must_use]
    pub fn border_thickness(&self) -> u32 {
        self.border_thickness
    }
}

/// A calibration print request: a mode plus the current settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationRequest {
    pub mode: CalibrationMode,
    pub settings: CalibrationSettings,
}

impl CalibrationRequest {
    #[must_use]
    pub fn new(mode: CalibrationMode, settings: CalibrationSettings) -> Self {
        Self { mode, settings }
    }

    /// Endpoint path for this request.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/api/calibration/{}", self.mode.name())
    }

    /// Form fields to submit: both offsets plus the mode-specific extra.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("offset_x", self.settings.offset_x.to_string()),
            ("offset_y", self.settings.offset_y.to_string()),
        ];
        match self.mode {
            CalibrationMode::Border => {
                fields.push(("thickness", self.settings.border_thickness.to_string()));
            }
            CalibrationMode::Grid => fields.push(("spacing", GRID_SPACING.to_string())),
            CalibrationMode::Corners => fields.push(("corner_size", CORNER_SIZE.to_string())),
            CalibrationMode::Rulers | CalibrationMode::Series => {}
        }
        fields
    }
}

/// Decoded body of `GET /api/calibration/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInfo {
    pub printer_width_pixels: u32,
    pub printer_width_mm: f64,
    pub label_width_px: u32,
    pub label_height_px: u32,
    pub label_width_mm: f64,
    pub label_height_mm: f64,
    pub pixels_per_mm: f64,
    #[serde(default)]
    pub available_modes: Vec<String>,
}

/// One print of a calibration series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub test_number: u32,
    pub description: String,
    pub success: bool,
}

/// Decoded body of `POST /api/calibration/{mode}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationOutcome {
    pub success: bool,
    pub message: Option<String>,
    /// Rendered image size (e.g. `"320x240px"`), single modes only.
    pub image_size: Option<String>,
    /// Per-print results, series mode only.
    pub results: Vec<SeriesResult>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_mode_from_its_name() {
        for mode in CalibrationMode::ALL {
            assert_eq!(mode.name().parse::<CalibrationMode>().unwrap(), mode);
        }
    }

    #[test]
    fn should_reject_unknown_mode_name() {
        let result = "spiral".parse::<CalibrationMode>();
        assert_eq!(
            result,
            Err(ValidationError::UnknownCalibrationMode("spiral".to_string()))
        );
    }

    #[test]
    fn should_send_thickness_for_border_mode() {
        let settings = CalibrationSettings::new(3, -4, 5).unwrap();
        let request = CalibrationRequest::new(CalibrationMode::Border, settings);
        assert_eq!(request.path(), "/api/calibration/border");
        assert_eq!(
            request.form_fields(),
            vec![
                ("offset_x", "3".to_string()),
                ("offset_y", "-4".to_string()),
                ("thickness", "5".to_string()),
            ]
        );
    }

    #[test]
    fn should_send_fixed_spacing_for_grid_mode() {
        let request =
            CalibrationRequest::new(CalibrationMode::Grid, CalibrationSettings::default());
        assert!(request.form_fields().contains(&("spacing", "5".to_string())));
        assert!(!request.form_fields().iter().any(|(k, _)| *k == "thickness"));
    }

    #[test]
    fn should_send_fixed_corner_size_for_corners_mode() {
        let request =
            CalibrationRequest::new(CalibrationMode::Corners, CalibrationSettings::default());
        assert!(request.form_fields().contains(&("corner_size", "15".to_string())));
    }

    #[test]
    fn should_send_only_offsets_for_rulers_and_series() {
        for mode in [CalibrationMode::Rulers, CalibrationMode::Series] {
            let request = CalibrationRequest::new(mode, CalibrationSettings::default());
            assert_eq!(request.form_fields().len(), 2, "{mode}");
        }
    }

    #[test]
    fn should_reject_offset_out_of_range() {
        assert_eq!(
            CalibrationSettings::new(21, 0, 2),
            Err(ValidationError::OffsetOutOfRange(21))
        );
        assert_eq!(
            CalibrationSettings::new(0, -21, 2),
            Err(ValidationError::OffsetOutOfRange(-21))
        );
    }

    #[test]
    fn should_reject_thickness_out_of_range() {
        assert_eq!(
            CalibrationSettings::new(0, 0, 0),
            Err(ValidationError::BorderThickness(0))
        );
        assert_eq!(
            CalibrationSettings::new(0, 0, 6),
            Err(ValidationError::BorderThickness(6))
        );
    }

    #[test]
    fn should_default_to_zero_offsets_and_thickness_two() {
        let settings = CalibrationSettings::default();
        assert_eq!(settings.offset_x(), 0);
        assert_eq!(settings.offset_y(), 0);
        assert_eq!(settings.border_thickness(), 2);
    }

    #[test]
    fn should_decode_series_outcome() {
        let json = serde_json::json!({
            "success": false,
            "message": "Offset-Serie (2 Tests)",
            "results": [
                {"test_number": 1, "description": "Offset 0,0", "success": true},
                {"test_number": 2, "description": "Offset 2,0", "success": false}
            ]
        });
        let outcome: CalibrationOutcome = serde_json::from_value(json).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results[0].success);
        assert!(outcome.image_size.is_none());
    }

    #[test]
    fn should_decode_calibration_info() {
        let json = serde_json::json!({
            "printer_width_pixels": 384,
            "printer_width_mm": 48,
            "label_width_px": 320,
            "label_height_px": 240,
            "label_width_mm": 40,
            "label_height_mm": 30,
            "pixels_per_mm": 8.0,
            "available_modes": ["border", "grid", "rulers", "corners", "series"]
        });
        let info: CalibrationInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.printer_width_pixels, 384);
        assert!((info.pixels_per_mm - 8.0).abs() < f64::EPSILON);
        assert_eq!(info.available_modes.len(), 5);
    }
}
