//! HTTP adapter error types.

use labeldeck_domain::error::DashboardError;

/// Errors specific to the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was not the expected JSON document.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-2xx status whose body was not JSON either.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

impl HttpError {
    /// Convert into a [`DashboardError`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> DashboardError {
        match self {
            Self::Decode(_) => DashboardError::Decode(Box::new(self)),
            Self::Request(_) | Self::Status(_) => DashboardError::Transport(Box::new(self)),
        }
    }
}

impl From<HttpError> for DashboardError {
    fn from(err: HttpError) -> Self {
        err.into_domain()
    }
}
