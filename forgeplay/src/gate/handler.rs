//! Completion notification seam.

use crate::core::RunSummary;

/// Receives the completion notification of a playback run.
///
/// Implemented for any `Fn(&RunSummary)` closure.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionHandler: Send + Sync {
    /// Called exactly once per completed run, after the terminal delay.
    fn on_complete(&self, summary: &RunSummary);
}

impl<F> CompletionHandler for F
where
    F: Fn(&RunSummary) + Send + Sync,
{
    fn on_complete(&self, summary: &RunSummary) {
        self(summary);
    }
}

/// A handler that ignores completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCompletionHandler;

impl CompletionHandler for NoOpCompletionHandler {
    fn on_complete(&self, _summary: &RunSummary) {}
}
