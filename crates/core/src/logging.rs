//! Sinks for streamed subprocess output

use tracing::info;

/// Receives output lines from the external tool as they are produced
pub trait LogSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Forwards every line to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn line(&self, line: &str) {
        info!(target: "pulumi", "{}", line);
    }
}

/// Discards output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn line(&self, _line: &str) {}
}
