use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// Sink for diagnostics raised while processing a context node.
///
/// Every tree carries one on its root (see [`crate::ContextTree::insert`]);
/// callers may install their own on any node to redirect a subtree.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Default logger: forwards to `tracing`. Never panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "annotation_scope", "{message}"),
            Level::WARN => tracing::warn!(target: "annotation_scope", "{message}"),
            Level::INFO => tracing::info!(target: "annotation_scope", "{message}"),
            Level::DEBUG => tracing::debug!(target: "annotation_scope", "{message}"),
            _ => tracing::trace!(target: "annotation_scope", "{message}"),
        }
    }
}

pub(crate) fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}

/// Shared handle stored as a fact value.
#[derive(Clone)]
pub struct LoggerHandle(pub Arc<dyn Logger>);

impl LoggerHandle {
    pub fn get(&self) -> &Arc<dyn Logger> {
        &self.0
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger(..)")
    }
}
