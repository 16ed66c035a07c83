use log::warn;

/// Where swallowed remote failures go
pub trait ErrorSink: Send + Sync {
    fn record(&self, context: &str, error: &dyn std::error::Error);
}

/// Writes every failure as a `warn!` line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn record(&self, context: &str, error: &dyn std::error::Error) {
        warn!("{}: {}", context, error);
    }
}
