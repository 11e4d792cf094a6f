//! The stage sequencer state machine.

use super::RunPlan;
use crate::config::{JitterRange, PlaybackConfig};
use crate::core::{PlaybackState, SequencerState};
use crate::emitter::LogEmitter;
use crate::stages::StageTable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// What a pending timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Emit the next line of the running stage.
    Line {
        /// The running stage.
        stage: usize,
    },
    /// End the inter-stage pause and start the next stage.
    StagePause {
        /// The stage to start.
        next_stage: usize,
    },
    /// End the terminal delay and request the completion notification.
    Terminal,
}

/// The single timer a run is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// How long to wait before firing.
    pub delay: Duration,
    /// What firing does.
    pub kind: TimerKind,
}

/// Something that happened while starting or firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A stage became the running stage.
    StageStarted {
        /// Stage index.
        index: usize,
    },
    /// A line was appended to the run's output.
    LineEmitted {
        /// Stage index.
        stage: usize,
        /// Line index within the stage.
        line: usize,
    },
    /// The running stage emitted its last line.
    StageCompleted {
        /// Stage index.
        index: usize,
    },
    /// The last stage finished; the sequencer is now `Complete`.
    Finished {
        /// Total lines emitted during the run.
        lines_emitted: usize,
    },
    /// The terminal delay elapsed; the host should be notified.
    CompletionDue,
}

/// Walks a stage table as an explicit state machine.
///
/// The sequencer never sleeps. It exposes at most one pending [`Timer`]; the
/// driver waits for it and calls [`Sequencer::fire`]. Dropping the timer is
/// the whole of cancellation.
#[derive(Debug)]
pub struct Sequencer {
    table: StageTable,
    plan: RunPlan,
    jitter: Option<JitterRange>,
    inter_stage_pause: Duration,
    terminal_delay: Duration,
    rng: StdRng,
    state: SequencerState,
    emitter: Option<LogEmitter>,
    pending: Option<Timer>,
}

impl Sequencer {
    /// Creates an idle sequencer and draws the run's budgets.
    #[must_use]
    pub fn new(table: StageTable, config: &PlaybackConfig) -> Self {
        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let plan = RunPlan::draw(&config.duration, &table, &mut rng);
        Self {
            table,
            plan,
            jitter: config.jitter,
            inter_stage_pause: config.inter_stage_pause(),
            terminal_delay: config.terminal_delay(),
            rng,
            state: SequencerState::Idle,
            emitter: None,
            pending: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The stage table being played.
    #[must_use]
    pub fn table(&self) -> &StageTable {
        &self.table
    }

    /// The run's budgets.
    #[must_use]
    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// The timer the run is waiting on, if any.
    #[must_use]
    pub fn next_timer(&self) -> Option<Timer> {
        self.pending
    }

    /// Idle → RunningStage(0). Does nothing unless idle.
    pub fn start(&mut self, state: &mut PlaybackState) -> Vec<SequencerEvent> {
        if self.state != SequencerState::Idle {
            return Vec::new();
        }
        vec![self.enter_stage(0, state)]
    }

    /// Fires the pending timer, returning what happened.
    ///
    /// Firing with no pending timer does nothing.
    pub fn fire(&mut self, state: &mut PlaybackState) -> Vec<SequencerEvent> {
        let Some(timer) = self.pending.take() else {
            return Vec::new();
        };

        match timer.kind {
            TimerKind::Line { stage } => self.emit_line(stage, state),
            TimerKind::StagePause { next_stage } => vec![self.enter_stage(next_stage, state)],
            TimerKind::Terminal => vec![SequencerEvent::CompletionDue],
        }
    }

    fn enter_stage(&mut self, index: usize, state: &mut PlaybackState) -> SequencerEvent {
        let emitter = LogEmitter::plan(
            index,
            &self.table[index],
            self.plan.stage_budget(index),
            self.jitter,
            &mut self.rng,
        );
        self.pending = emitter.next_delay().map(|delay| Timer {
            delay,
            kind: TimerKind::Line { stage: index },
        });
        self.emitter = Some(emitter);
        self.state = SequencerState::RunningStage(index);
        state.enter_stage(index);
        SequencerEvent::StageStarted { index }
    }

    fn emit_line(&mut self, stage: usize, state: &mut PlaybackState) -> Vec<SequencerEvent> {
        let Some(emitter) = self.emitter.as_mut() else {
            return Vec::new();
        };
        let Some(emitted) = emitter.emit(&self.table[stage], state) else {
            return Vec::new();
        };

        let mut events = vec![SequencerEvent::LineEmitted {
            stage,
            line: emitted.line_index,
        }];

        if !emitted.stage_done {
            self.pending = emitter.next_delay().map(|delay| Timer {
                delay,
                kind: TimerKind::Line { stage },
            });
            return events;
        }

        events.push(SequencerEvent::StageCompleted { index: stage });
        self.emitter = None;

        if stage + 1 < self.table.len() {
            self.pending = Some(Timer {
                delay: self.inter_stage_pause,
                kind: TimerKind::StagePause {
                    next_stage: stage + 1,
                },
            });
        } else {
            self.state = SequencerState::Complete;
            state.mark_complete(self.table.len());
            events.push(SequencerEvent::Finished {
                lines_emitted: state.emitted_lines().len(),
            });
            self.pending = Some(Timer {
                delay: self.terminal_delay,
                kind: TimerKind::Terminal,
            });
        }
        events
    }
}
