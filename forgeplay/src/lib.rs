//! # Forgeplay
//!
//! A staged playback engine for a proof-market dashboard.
//!
//! Forgeplay walks a fixed table of labeled stages, revealing each stage's
//! log lines one at a time on a jittered schedule, and tells the host once the
//! whole run has played out. It provides:
//!
//! - **Stage tables**: validated, ordered stages with the built-in scripts
//! - **Sequencing**: an explicit state machine with one pending timer per run
//! - **Progress**: a pure projection of run state onto a percentage
//! - **Activation**: a boolean gate that starts fresh runs and cancels them
//! - **Market metrics**: seeded, clock-driven numbers for the surrounding dashboard
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forgeplay::prelude::*;
//!
//! let gate = ActivationGate::new(zk_computation(), PlaybackConfig::zk_computation())?
//!     .on_complete(|summary| println!("done: {} lines", summary.lines_emitted));
//!
//! gate.set_active(true);
//! // ... render gate.snapshot() as often as needed ...
//! gate.set_active(false);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod emitter;
pub mod errors;
pub mod events;
pub mod gate;
pub mod market;
pub mod observability;
pub mod progress;
pub mod sequencer;
pub mod stages;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{DurationPolicy, JitterRange, LoggingConfig, PlaybackConfig};
    pub use crate::core::{
        PlaybackEvent, PlaybackSnapshot, PlaybackState, RunSummary, SequencerState,
    };
    pub use crate::errors::{ConfigError, PlaybackError, Result};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::gate::{ActivationGate, CompletionHandler, NoOpCompletionHandler, RunOutcome};
    pub use crate::market::{ActivityFeed, AlgorithmBoard, MetricsSampler, RequestBoard};
    pub use crate::observability::init_tracing;
    pub use crate::progress::project;
    pub use crate::sequencer::{Sequencer, SequencerEvent};
    pub use crate::stages::{badge_forge, zk_computation, Stage, StageTable};
    pub use crate::utils::{generate_run_id, iso_timestamp, Timestamp};
}
