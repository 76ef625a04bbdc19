//! Dashboard view model: the single source of truth renderers observe.
//!
//! Every refresh and command writes into one [`DashboardState`] held by a
//! [`tokio::sync::watch`] channel. Renderers subscribe and redraw whenever it
//! changes. Writes are last-write-wins; nothing orders concurrent updates
//! beyond the stale-response guard in the refresher.

pub mod panels;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

use labeldeck_domain::calibration::CalibrationSettings;
use labeldeck_domain::connection::Stats;
use labeldeck_domain::error::ValidationError;
use labeldeck_domain::print::{DEFAULT_TEXT, FontSize};

pub use panels::{CalibrationPanel, ConnectionPanel, DebugPanel, DetailLine, QueuePanel, Tone};

/// How long a banner stays visible unless replaced.
pub const DEFAULT_BANNER_LIFETIME: Duration = Duration::from_secs(8);

/// Kind of a transient banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

/// Transient status message shown above the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

/// Operator-editable form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintForm {
    pub text: String,
    pub font_size: FontSize,
    pub calibration: CalibrationSettings,
}

impl Default for PrintForm {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_size: FontSize::default(),
            calibration: CalibrationSettings::default(),
        }
    }
}

/// Everything the console shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub banner: Option<Banner>,
    pub connection: Option<ConnectionPanel>,
    pub stats: Option<Stats>,
    pub queue: QueuePanel,
    pub debug: Option<DebugPanel>,
    pub calibration: Option<CalibrationPanel>,
    pub form: PrintForm,
}

struct Inner {
    state: watch::Sender<DashboardState>,
    banner_generation: AtomicU64,
    banner_lifetime: Duration,
}

/// Shared handle to the dashboard view model.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_LIFETIME)
    }
}

impl Dashboard {
    /// Create an empty dashboard whose banners expire after `banner_lifetime`.
    #[must_use]
    pub fn new(banner_lifetime: Duration) -> Self {
        Self::with_form(banner_lifetime, PrintForm::default())
    }

    /// Create an empty dashboard with a prefilled form.
    #[must_use]
    pub fn with_form(banner_lifetime: Duration, form: PrintForm) -> Self {
        let (state, _) = watch::channel(DashboardState {
            form,
            ..DashboardState::default()
        });
        Self {
            inner: Arc::new(Inner {
                state,
                banner_generation: AtomicU64::new(0),
                banner_lifetime,
            }),
        }
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Read part of the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    /// Apply `f` to the state in a single render pass and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut DashboardState)) {
        self.inner.state.send_modify(f);
    }

    /// Replace the banner and schedule its removal.
    ///
    /// A newer banner supersedes this one: the pending removal then leaves
    /// the newer banner alone. Must be called from within a tokio runtime.
    pub fn show_banner(&self, kind: BannerKind, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(?kind, %text, "banner");
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            generation = self.inner.banner_generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.banner = Some(Banner { kind, text });
        });

        let dashboard = self.clone();
        let lifetime = self.inner.banner_lifetime;
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            dashboard.expire_banner(generation);
        });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show_banner(BannerKind::Info, text);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show_banner(BannerKind::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show_banner(BannerKind::Error, text);
    }

    fn expire_banner(&self, generation: u64) {
        self.inner.state.send_if_modified(|state| {
            let current = self.inner.banner_generation.load(Ordering::SeqCst);
            if current == generation && state.banner.is_some() {
                state.banner = None;
                true
            } else {
                false
            }
        });
    }

    /// Replace the print text.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.form.text = text);
    }

    /// Select a font size preset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FontSize`] when `pixels` is not a preset.
    pub fn set_font_size(&self, pixels: u32) -> Result<(), ValidationError> {
        let font_size = FontSize::try_from(pixels)?;
        self.update(|state| state.form.font_size = font_size);
        Ok(())
    }

    /// Set both calibration offsets, keeping the border thickness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OffsetOutOfRange`] when an offset is out of range.
    pub fn set_offsets(&self, offset_x: i32, offset_y: i32) -> Result<(), ValidationError> {
        let thickness = self.read(|state| state.form.calibration.border_thickness());
        let settings = CalibrationSettings::new(offset_x, offset_y, thickness)?;
        self.update(|state| state.form.calibration = settings);
        Ok(())
    }

    /// Set the border thickness, keeping the offsets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BorderThickness`] when out of range.
    pub fn set_border_thickness(&self, thickness: u32) -> Result<(), ValidationError> {
        let current = self.read(|state| state.form.calibration);
        let settings = CalibrationSettings::new(current.offset_x(), current.offset_y(), thickness)?;
        self.update(|state| state.form.calibration = settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_clear_banner_after_lifetime() {
        let dashboard = Dashboard::default();
        dashboard.info("hello");
        assert_eq!(
            dashboard.snapshot().banner,
            Some(Banner {
                kind: BannerKind::Info,
                text: "hello".to_string()
            })
        );

        tokio::time::sleep(Duration::from_millis(7_900)).await;
        assert!(dashboard.snapshot().banner.is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(dashboard.snapshot().banner.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_newer_banner_when_older_one_expires() {
        let dashboard = Dashboard::default();
        dashboard.info("first");
        tokio::time::sleep(Duration::from_secs(5)).await;
        dashboard.success("second");

        // first banner's deadline (t=8s) passes
        tokio::time::sleep(Duration::from_millis(3_100)).await;
        let banner = dashboard.snapshot().banner.unwrap();
        assert_eq!(banner.text, "second");
        assert_eq!(banner.kind, BannerKind::Success);

        // second banner's deadline (t=13s) passes
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(dashboard.snapshot().banner.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn should_honour_custom_banner_lifetime() {
        let dashboard = Dashboard::new(Duration::from_secs(2));
        dashboard.error("boom");
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert!(dashboard.snapshot().banner.is_none());
    }

    #[tokio::test]
    async fn should_notify_subscribers_on_update() {
        let dashboard = Dashboard::default();
        let mut rx = dashboard.subscribe();
        dashboard.update(|state| state.stats = Some(Stats::default()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().stats, Some(Stats::default()));
    }

    #[test]
    fn should_prefill_form_with_defaults() {
        let dashboard = Dashboard::default();
        let form = dashboard.snapshot().form;
        assert_eq!(form.text, DEFAULT_TEXT);
        assert_eq!(form.font_size.pixels(), 22);
        assert_eq!(form.calibration, CalibrationSettings::default());
    }

    #[test]
    fn should_reject_non_preset_font_size() {
        let dashboard = Dashboard::default();
        assert_eq!(
            dashboard.set_font_size(23),
            Err(ValidationError::FontSize(23))
        );
        assert_eq!(dashboard.snapshot().form.font_size.pixels(), 22);
        dashboard.set_font_size(30).unwrap();
        assert_eq!(dashboard.snapshot().form.font_size.pixels(), 30);
    }

    #[test]
    fn should_keep_thickness_when_setting_offsets() {
        let dashboard = Dashboard::default();
        dashboard.set_border_thickness(4).unwrap();
        dashboard.set_offsets(-5, 7).unwrap();
        let settings = dashboard.snapshot().form.calibration;
        assert_eq!(settings.offset_x(), -5);
        assert_eq!(settings.offset_y(), 7);
        assert_eq!(settings.border_thickness(), 4);
    }

    #[test]
    fn should_reject_offsets_out_of_range() {
        let dashboard = Dashboard::default();
        assert_eq!(
            dashboard.set_offsets(0, 99),
            Err(ValidationError::OffsetOutOfRange(99))
        );
    }
}
