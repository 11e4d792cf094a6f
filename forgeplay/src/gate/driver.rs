//! The task that waits on a run's timer and fires the sequencer.

use super::CompletionHandler;
use crate::cancellation::CancellationToken;
use crate::core::{PlaybackEvent, PlaybackState, RunSummary};
use crate::events::EventSink;
use crate::sequencer::{Sequencer, SequencerEvent};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How a run's driver finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The completion handler was invoked.
    Completed(RunSummary),
    /// The run was cancelled before completing.
    Cancelled,
}

/// Everything one run needs, moved into its driver task.
pub(crate) struct RunDriver {
    pub(crate) run_id: Uuid,
    pub(crate) sequencer: Sequencer,
    pub(crate) state: Arc<RwLock<PlaybackState>>,
    pub(crate) token: Arc<CancellationToken>,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) handler: Arc<dyn CompletionHandler>,
}

impl RunDriver {
    /// Waits on the pending timer, fires it, and repeats until completion or
    /// cancellation. Only one timer is ever outstanding.
    pub(crate) async fn drive(mut self) -> RunOutcome {
        let started = Instant::now();

        while let Some(timer) = self.sequencer.next_timer() {
            tokio::select! {
                biased;
                () = self.token.cancelled() => {
                    debug!(run_id = %self.run_id, "Driver observed cancellation");
                    return RunOutcome::Cancelled;
                }
                () = tokio::time::sleep(timer.delay) => {}
            }

            let completion_due = {
                let mut state = self.state.write();
                // Checked under the lock: deactivation cancels before it resets.
                if self.token.is_cancelled() || !state.belongs_to(self.run_id) {
                    return RunOutcome::Cancelled;
                }
                let events = self.sequencer.fire(&mut state);
                publish_events(self.run_id, &self.sequencer, &events, self.sink.as_ref());
                events.contains(&SequencerEvent::CompletionDue)
            };

            if completion_due {
                return self.complete(started);
            }
        }

        warn!(run_id = %self.run_id, "Run ran out of timers without completing");
        RunOutcome::Cancelled
    }

    fn complete(&self, started: Instant) -> RunOutcome {
        let summary = {
            let state = self.state.read();
            if self.token.is_cancelled() || !state.belongs_to(self.run_id) {
                return RunOutcome::Cancelled;
            }
            RunSummary {
                run_id: self.run_id,
                stages: self.sequencer.table().len(),
                lines_emitted: state.emitted_lines().len(),
                budget_ms: self.sequencer.plan().total_ms(),
            }
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            run_id = %self.run_id,
            lines = summary.lines_emitted,
            elapsed_ms,
            "Playback run completed"
        );
        // Published first: the handler may dismiss the run.
        self.sink.publish(&PlaybackEvent::completed(self.run_id, elapsed_ms));
        self.handler.on_complete(&summary);
        RunOutcome::Completed(summary)
    }
}

/// Translates sequencer events into sink events.
pub(crate) fn publish_events(
    run_id: Uuid,
    sequencer: &Sequencer,
    events: &[SequencerEvent],
    sink: &dyn EventSink,
) {
    let table = sequencer.table();
    for event in events {
        let published = match *event {
            SequencerEvent::StageStarted { index } => {
                let label = table[index].label();
                info!(run_id = %run_id, stage = index, label, "Stage started");
                PlaybackEvent::stage_started(run_id, index, label)
            }
            SequencerEvent::LineEmitted { stage, line } => {
                let text = table[stage].lines()[line].as_str();
                debug!(run_id = %run_id, stage, line, text, "Line emitted");
                PlaybackEvent::line_emitted(run_id, stage, line, text)
            }
            SequencerEvent::StageCompleted { index } => {
                PlaybackEvent::stage_completed(run_id, index, table[index].label())
            }
            SequencerEvent::Finished { lines_emitted } => {
                info!(run_id = %run_id, lines_emitted, "All stages finished");
                PlaybackEvent::finished(run_id, lines_emitted)
            }
            // Published by the driver right before the handler runs.
            SequencerEvent::CompletionDue => continue,
        };
        sink.publish(&published);
    }
}
