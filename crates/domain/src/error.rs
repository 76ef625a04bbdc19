//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DashboardError`] at the port boundary via `From`.

use std::error::Error as StdError;

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of a request to the printer service.
///
/// Operator input is checked before any request is built, so invalid input
/// surfaces as a [`ValidationError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The request never produced a response (rejected, unreachable, …).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A response arrived but its body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(#[source] BoxError),
}

/// Operator input that violates a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Print text is empty after trimming.
    #[error("text must not be empty")]
    EmptyText,

    /// Font size is not one of the supported presets.
    #[error("unsupported font size {0}px")]
    FontSize(u32),

    /// Calibration offset outside of the accepted range.
    #[error("offset {0} is outside of -20..=20")]
    OffsetOutOfRange(i32),

    /// Border thickness outside of the accepted range.
    #[error("border thickness {0} is outside of 1..=5")]
    BorderThickness(u32),

    /// Calibration mode name is not one of the known modes.
    #[error("unknown calibration mode {0:?}")]
    UnknownCalibrationMode(String),
}
