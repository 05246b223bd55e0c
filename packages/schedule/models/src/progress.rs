//! Progress reporting for multi-page and multi-year extractions.
//!
//! Library crates report through [`ProgressCallback`] without knowing how
//! (or whether) progress is rendered. The CLI plugs in `indicatif` bars;
//! tests and scripted runs use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a long-running extraction.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (pages, years, ...).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
