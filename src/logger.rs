//! Logging capability handed to the merge pipeline.
//!
//! The pipeline reports progress and skipped files through [`MergeLogger`] instead of
//! calling the `log` macros directly, so callers can route or silence the messages.

/// Sink for messages produced while merging.
pub trait MergeLogger {
    fn debug(&self, _message: &str) {}

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl MergeLogger for LogFacade {
    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl MergeLogger for NoopLogger {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
