/// Destination for human-readable diagnostics.
///
/// The resolver never prints; whatever consumes it decides how messages are
/// rendered (styled console output in the CLI, nothing in tests).
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Discards every message.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
