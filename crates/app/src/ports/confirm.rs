//! Confirm port: interactive yes/no question.

use std::future::Future;

/// Asks the operator to confirm a destructive command.
pub trait Confirm {
    /// Show `prompt` and resolve to `true` only when the operator accepts.
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}

impl<T: Confirm + Sync> Confirm for std::sync::Arc<T> {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
        (**self).confirm(prompt)
    }
}
