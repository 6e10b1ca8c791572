//! User-facing notifications
//!
//! Rollback is silent in the data model but not to the user: when a
//! confirmation fails, the controller fires one message through whatever
//! alert/toast surface the hosting app wires in. Fire-and-forget; nothing is
//! read back.

/// Alert/toast surface invoked on rollback
pub trait Notifier: Send + Sync {
    /// Show a user-visible error message
    fn error(&self, message: &str);
}

/// Default notifier that routes messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::error!(%message, "user-facing error");
    }
}
