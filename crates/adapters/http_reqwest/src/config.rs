//! HTTP client configuration.

use serde::Deserialize;

/// Where the printer service lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Origin of the printer service, e.g. `http://127.0.0.1:8080`.
    ///
    /// A trailing slash is ignored.
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

impl HttpConfig {
    /// Absolute URL of `path` (which starts with `/`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}
