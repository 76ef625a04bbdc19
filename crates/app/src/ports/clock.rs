//! Clock port: local wall-clock time.

use labeldeck_domain::time::{self, Timestamp};

/// Source of the local time used for the `$TIME$` placeholder, the test
/// label and panel footers.
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
