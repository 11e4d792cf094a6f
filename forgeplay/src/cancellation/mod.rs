//! Cooperative cancellation for playback runs.
//!
//! Every run owns exactly one [`CancellationToken`]; deactivating the gate
//! cancels it, which wakes the run's single pending timer.

mod token;

pub use token::{CancelCallback, CancellationToken};
