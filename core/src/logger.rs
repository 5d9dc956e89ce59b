//! Diagnostic logger injected into `QiitaClient`.
//!
//! Messages are informational only; nothing the client returns depends on
//! them.

use tracing::Level;

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards messages as `tracing` events under the `qiita_core` target.
///
/// Output appears only when the application installs a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "qiita_core", "{message}"),
            Level::WARN => tracing::warn!(target: "qiita_core", "{message}"),
            Level::INFO => tracing::info!(target: "qiita_core", "{message}"),
            Level::DEBUG => tracing::debug!(target: "qiita_core", "{message}"),
            _ => tracing::trace!(target: "qiita_core", "{message}"),
        }
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _message: &str) {}
}
