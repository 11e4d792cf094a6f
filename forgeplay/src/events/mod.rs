//! Event sink system for observing playback runs.
//!
//! Sinks receive lifecycle events ("playback.started", "line.emitted",
//! "stage.completed", ...) as they happen. They never influence playback.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
