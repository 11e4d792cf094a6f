//! Tracing setup and per-run spans.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host. [`init_tracing`] is the convenience for binaries, benches and
//! ad-hoc debugging.

use crate::config::LoggingConfig;
use tracing::Span;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns false if a global subscriber
/// was already installed, which is not an error.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.json {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    installed.is_ok()
}

/// The span a run's driver task executes in.
#[must_use]
pub fn run_span(run_id: Uuid, stages: usize) -> Span {
    tracing::info_span!("playback_run", run_id = %run_id, stages)
}
