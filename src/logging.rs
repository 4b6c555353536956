//! Injected diagnostics sink.
//!
//! Adapters and transactions never log through process-wide state; they hold an
//! `Arc<dyn AdapterLog>` handed in at construction.

use std::fmt;
use std::sync::Arc;

pub const LOG_TARGET: &str = "tidbcloud::driver_adapter";

pub trait AdapterLog: Send + Sync + fmt::Debug {
    /// Trace a call, e.g. `("[query_raw]", &query)`.
    fn debug(&self, tag: &str, detail: &dyn fmt::Debug);

    /// A condition worth surfacing that is not an error of any call.
    fn warn(&self, tag: &str, message: &str);

    /// Report a failure. Used both before re-raising an error and for errors that
    /// must not be raised at all (rollback during disposal).
    fn error(&self, tag: &str, error: &dyn std::error::Error);
}

/// Forwards to `tracing`. Emits nothing unless the host installs a subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl AdapterLog for TracingLog {
    fn debug(&self, tag: &str, detail: &dyn fmt::Debug) {
        tracing::debug!(target: LOG_TARGET, "{tag} {detail:?}");
    }

    fn warn(&self, tag: &str, message: &str) {
        tracing::warn!(target: LOG_TARGET, "{tag} {message}");
    }

    fn error(&self, tag: &str, error: &dyn std::error::Error) {
        tracing::error!(target: LOG_TARGET, "{tag} {error}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl AdapterLog for NoopLog {
    fn debug(&self, _tag: &str, _detail: &dyn fmt::Debug) {}

    fn warn(&self, _tag: &str, _message: &str) {}

    fn error(&self, _tag: &str, _error: &dyn std::error::Error) {}
}

#[must_use]
pub fn default_log() -> Arc<dyn AdapterLog> {
    Arc::new(TracingLog)
}
