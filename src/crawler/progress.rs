//! Crawl progress reporting
//!
//! The engine reports `(done, total, message)` synchronously from its own
//! task. Sinks must return quickly; the crawl waits for them.

/// Receiver of crawl progress events
pub trait ProgressSink {
    fn report(&mut self, done: u64, total: u64, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(u64, u64, &str),
{
    fn report(&mut self, done: u64, total: u64, message: &str) {
        self(done, total, message)
    }
}

/// Sink that forwards progress to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&mut self, done: u64, total: u64, message: &str) {
        tracing::info!("[{}/{}] {}", done, total, message);
    }
}
