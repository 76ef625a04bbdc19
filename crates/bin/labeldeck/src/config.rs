//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `labeldeck.toml` in the working directory unless another path
//! is given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values, and the
//! `--base-url` flag over both.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use labeldeck_adapter_http_reqwest::HttpConfig;
use labeldeck_app::dashboard::PrintForm;
use labeldeck_app::dispatcher::DispatcherConfig;
use labeldeck_domain::print::{DEFAULT_TEXT, FontSize, TestLabel};

/// File read when no `--config` is given.
pub const DEFAULT_PATH: &str = "labeldeck.toml";

/// Longest accepted poll interval and banner lifetime, in seconds.
pub const MAX_PERIOD_SECS: u64 = 86_400;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Printer service location.
    pub backend: HttpConfig,
    /// Poll and follow-up timings.
    pub polling: PollingConfig,
    /// Banner settings.
    pub banner: BannerConfig,
    /// Print form defaults and test label template.
    pub label: LabelConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Poll and follow-up timings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between two status refreshes.
    pub interval_secs: u64,
    /// Delay of the status refresh after reconnect commands, in milliseconds.
    pub follow_up_ms: u64,
    /// Delay of the status refresh after a print, in milliseconds.
    pub print_follow_up_ms: u64,
}

/// Banner settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    /// Seconds a banner stays visible unless replaced.
    pub lifetime_secs: u64,
}

/// Print form defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// First line of the test label.
    pub title: String,
    /// Second line of the test label.
    pub subtitle: String,
    /// Initial font size in pixels; must be a preset.
    pub font_size: u32,
    /// Initial print text.
    pub text: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (or `labeldeck.toml` if present),
    /// apply environment overrides, then `base_url` from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicit `path`
    /// cannot be read, or if the result fails validation.
    pub fn load(path: Option<&Path>, base_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path, false)?,
            None => Self::from_file(Path::new(DEFAULT_PATH), true)?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        if let Some(base_url) = base_url {
            config.backend.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, optional: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if optional && err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LABELDECK_BASE_URL") {
            self.backend.base_url = val;
        }
        if let Some(secs) = var("LABELDECK_POLL_INTERVAL").and_then(|val| val.parse().ok()) {
            self.polling.interval_secs = secs;
        }
        if let Some(val) = var("LABELDECK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "base_url {base_url:?} must start with http:// or https://"
            )));
        }
        if !(1..=MAX_PERIOD_SECS).contains(&self.polling.interval_secs) {
            return Err(ConfigError::Validation(format!(
                "polling interval must be within 1..={MAX_PERIOD_SECS} seconds"
            )));
        }
        if !(1..=MAX_PERIOD_SECS).contains(&self.banner.lifetime_secs) {
            return Err(ConfigError::Validation(format!(
                "banner lifetime must be within 1..={MAX_PERIOD_SECS} seconds"
            )));
        }
        FontSize::try_from(self.label.font_size)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    #[must_use]
    pub fn banner_lifetime(&self) -> Duration {
        Duration::from_secs(self.banner.lifetime_secs)
    }

    #[must_use]
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            follow_up_delay: Duration::from_millis(self.polling.follow_up_ms),
            print_follow_up_delay: Duration::from_millis(self.polling.print_follow_up_ms),
            test_label: TestLabel {
                title: self.label.title.clone(),
                subtitle: self.label.subtitle.clone(),
            },
        }
    }

    /// Initial print form. The font size was checked by validation.
    #[must_use]
    pub fn print_form(&self) -> PrintForm {
        PrintForm {
            text: self.label.text.clone(),
            font_size: FontSize::try_from(self.label.font_size).unwrap_or_default(),
            ..PrintForm::default()
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            follow_up_ms: 1_000,
            print_follow_up_ms: 500,
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self { lifetime_secs: 8 }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        let template = TestLabel::default();
        Self {
            title: template.title,
            subtitle: template.subtitle,
            font_size: FontSize::default().pixels(),
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,labeldeck=info,labeldeck_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
