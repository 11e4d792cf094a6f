//! Core domain model types for forgeplay.
//!
//! This module contains the fundamental types used throughout the engine:
//! - The sequencer state enum
//! - Per-run playback state, host snapshots and run summaries
//! - Playback lifecycle events

mod event;
mod state;
mod status;

pub use event::PlaybackEvent;
pub use state::{PlaybackSnapshot, PlaybackState, RunSummary};
pub use status::SequencerState;
