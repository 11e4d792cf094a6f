//! The activation gate: the host-facing entry point of playback.
//!
//! A host flips the gate on to start a fresh run and off to tear it down.
//! While active, the gate owns one driver task and one cancellation token;
//! turning it off (or dropping it) cancels both, so no line or transition
//! lands after deactivation.

mod driver;
mod handler;
#[cfg(test)]
mod integration_tests;

pub use driver::RunOutcome;
pub use handler::{CompletionHandler, NoOpCompletionHandler};

#[cfg(test)]
pub use handler::MockCompletionHandler;

use crate::cancellation::CancellationToken;
use crate::config::PlaybackConfig;
use crate::core::{PlaybackEvent, PlaybackSnapshot, PlaybackState};
use crate::errors::Result;
use crate::events::{EventSink, NoOpEventSink};
use crate::observability::run_span;
use crate::progress::project_state;
use crate::sequencer::Sequencer;
use crate::stages::StageTable;
use crate::utils::generate_run_id;
use driver::{publish_events, RunDriver};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// The run currently owned by the gate.
struct ActiveRun {
    run_id: Uuid,
    token: Arc<CancellationToken>,
    handle: JoinHandle<RunOutcome>,
}

/// Boolean-controlled entry point that starts and stops playback runs.
pub struct ActivationGate {
    table: StageTable,
    config: PlaybackConfig,
    sink: Arc<dyn EventSink>,
    handler: Arc<dyn CompletionHandler>,
    state: Arc<RwLock<PlaybackState>>,
    run: Mutex<Option<ActiveRun>>,
}

impl ActivationGate {
    /// Creates an inactive gate after validating `config`.
    pub fn new(table: StageTable, config: PlaybackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table,
            config,
            sink: Arc::new(NoOpEventSink),
            handler: Arc::new(NoOpCompletionHandler),
            state: Arc::new(RwLock::new(PlaybackState::default())),
            run: Mutex::new(None),
        })
    }

    /// Sets the event sink that observes runs.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the completion handler.
    #[must_use]
    pub fn with_completion_handler(mut self, handler: Arc<dyn CompletionHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Sets the completion handler from a closure.
    #[must_use]
    pub fn on_complete<F>(self, handler: F) -> Self
    where
        F: Fn(&crate::core::RunSummary) + Send + Sync + 'static,
    {
        self.with_completion_handler(Arc::new(handler))
    }

    /// The stage table played by this gate.
    #[must_use]
    pub fn table(&self) -> &StageTable {
        &self.table
    }

    /// The configuration runs are started with.
    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Drives the gate's boolean input.
    ///
    /// Off → on starts a fresh run; on → off cancels and discards it. Setting
    /// the current value again does nothing.
    ///
    /// # Panics
    ///
    /// Activating outside a Tokio runtime panics, as `tokio::spawn` does.
    pub fn set_active(&self, active: bool) {
        if active {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    /// Starts a fresh run unless one is already active.
    pub fn activate(&self) {
        let mut slot = self.run.lock();
        if slot.is_some() {
            debug!("Gate already active; ignoring activation");
            return;
        }

        let run_id = generate_run_id();
        let token = Arc::new(CancellationToken::new());
        token.on_cancel(move |reason| {
            info!(run_id = %run_id, reason, "Playback run cancelled");
        });

        let mut sequencer = Sequencer::new(self.table.clone(), &self.config);
        {
            let mut state = self.state.write();
            *state = PlaybackState::fresh(run_id);
            info!(
                run_id = %run_id,
                stages = self.table.len(),
                budget_ms = sequencer.plan().total_ms(),
                "Playback run started"
            );
            self.sink.publish(&PlaybackEvent::started(
                run_id,
                self.table.len(),
                sequencer.plan().total_ms(),
            ));
            let events = sequencer.start(&mut state);
            publish_events(run_id, &sequencer, &events, self.sink.as_ref());
        }

        let driver = RunDriver {
            run_id,
            sequencer,
            state: self.state.clone(),
            token: token.clone(),
            sink: self.sink.clone(),
            handler: self.handler.clone(),
        };
        let span = run_span(run_id, self.table.len());
        let handle = tokio::spawn(driver.drive().instrument(span));

        *slot = Some(ActiveRun {
            run_id,
            token,
            handle,
        });
    }

    /// Cancels the active run, if any, and discards its state.
    pub fn deactivate(&self) {
        self.teardown("deactivated");
    }

    /// Closes a run after its completion notification.
    ///
    /// Equivalent to deactivating; a run that has not finished is cancelled.
    pub fn dismiss(&self) {
        self.teardown("dismissed");
    }

    fn teardown(&self, reason: &str) {
        let Some(run) = self.run.lock().take() else {
            debug!("Gate already inactive; ignoring deactivation");
            return;
        };

        run.token.cancel(reason);
        run.handle.abort();

        let (was_complete, discarded) = {
            let mut state = self.state.write();
            let summary = (state.is_complete(), state.emitted_lines().len());
            state.discard();
            summary
        };

        if was_complete {
            self.sink.publish(&PlaybackEvent::dismissed(run.run_id));
        } else {
            self.sink
                .publish(&PlaybackEvent::cancelled(run.run_id, reason, discarded));
        }
    }

    /// Whether a run is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.run.lock().is_some()
    }

    /// The id of the active run.
    #[must_use]
    pub fn run_id(&self) -> Option<Uuid> {
        self.run.lock().as_ref().map(|run| run.run_id)
    }

    /// A read-only copy of the active run's state.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.state.read();
        if state.run_id().is_none() {
            return PlaybackSnapshot::inactive();
        }

        let sequencer_state = state.sequencer_state();
        PlaybackSnapshot {
            run_id: state.run_id(),
            state: sequencer_state,
            stage_label: sequencer_state
                .stage_index()
                .and_then(|index| self.table.get(index))
                .map(|stage| stage.label().to_string()),
            emitted_lines: state.emitted_lines().to_vec(),
            progress: project_state(&state, &self.table),
            is_complete: state.is_complete(),
        }
    }

    /// The active run's projected completion percentage.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let state = self.state.read();
        if state.run_id().is_none() {
            return 0.0;
        }
        project_state(&state, &self.table)
    }
}

impl Drop for ActivationGate {
    fn drop(&mut self) {
        if let Some(run) = self.run.get_mut().take() {
            run.token.cancel("gate dropped");
            run.handle.abort();
        }
    }
}

impl std::fmt::Debug for ActivationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationGate")
            .field("stages", &self.table.len())
            .field("active", &self.is_active())
            .field("run_id", &self.run_id())
            .finish()
    }
}
