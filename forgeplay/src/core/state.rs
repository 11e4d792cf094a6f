//! Per-run playback state and the read-only views handed to hosts.

use super::SequencerState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The mutable state of one playback run.
///
/// Only the log emitter and stage sequencer mutate this, and only while the
/// state still belongs to their run. Hosts see it through [`PlaybackSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    run_id: Option<Uuid>,
    current_stage_index: usize,
    lines_in_stage: usize,
    emitted_lines: Vec<String>,
    is_complete: bool,
}

impl PlaybackState {
    /// Creates an empty state owned by the given run.
    #[must_use]
    pub fn fresh(run_id: Uuid) -> Self {
        Self {
            run_id: Some(run_id),
            ..Self::default()
        }
    }

    /// The run that owns this state, if any.
    #[must_use]
    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Returns true if the state is owned by `run_id`.
    #[must_use]
    pub fn belongs_to(&self, run_id: Uuid) -> bool {
        self.run_id == Some(run_id)
    }

    /// Index of the current stage, equal to the stage count once complete.
    #[must_use]
    pub fn current_stage_index(&self) -> usize {
        self.current_stage_index
    }

    /// Number of lines emitted so far in the current stage.
    #[must_use]
    pub fn lines_in_stage(&self) -> usize {
        self.lines_in_stage
    }

    /// All lines emitted during this run, in order.
    #[must_use]
    pub fn emitted_lines(&self) -> &[String] {
        &self.emitted_lines
    }

    /// Whether every stage has finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// The sequencer state this playback state corresponds to.
    ///
    /// During an inter-stage pause the finished stage is still reported as
    /// running, matching the sequencer.
    #[must_use]
    pub fn sequencer_state(&self) -> SequencerState {
        if self.run_id.is_none() {
            SequencerState::Idle
        } else if self.is_complete {
            SequencerState::Complete
        } else {
            SequencerState::RunningStage(self.current_stage_index)
        }
    }

    pub(crate) fn append_line(&mut self, text: &str) {
        self.emitted_lines.push(text.to_string());
        self.lines_in_stage += 1;
    }

    pub(crate) fn enter_stage(&mut self, index: usize) {
        self.current_stage_index = index;
        self.lines_in_stage = 0;
    }

    pub(crate) fn mark_complete(&mut self, stage_count: usize) {
        self.current_stage_index = stage_count;
        self.lines_in_stage = 0;
        self.is_complete = true;
    }

    pub(crate) fn discard(&mut self) {
        *self = Self::default();
    }
}

/// A read-only copy of a run's state, with the derived progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// The run the snapshot was taken from.
    pub run_id: Option<Uuid>,
    /// Sequencer state at snapshot time.
    pub state: SequencerState,
    /// Label of the current stage, if a stage is running.
    pub stage_label: Option<String>,
    /// Lines emitted so far.
    pub emitted_lines: Vec<String>,
    /// Projected completion percentage in `[0, 100]`.
    pub progress: f64,
    /// Whether every stage has finished.
    pub is_complete: bool,
}

impl PlaybackSnapshot {
    /// The snapshot of an inactive gate.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            run_id: None,
            state: SequencerState::Idle,
            stage_label: None,
            emitted_lines: Vec::new(),
            progress: 0.0,
            is_complete: false,
        }
    }

    /// Number of emitted lines ("operations completed").
    #[must_use]
    pub fn operations_completed(&self) -> usize {
        self.emitted_lines.len()
    }
}

/// Handed to the completion handler once per completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The completed run.
    pub run_id: Uuid,
    /// Number of stages traversed.
    pub stages: usize,
    /// Number of lines emitted.
    pub lines_emitted: usize,
    /// Total line budget the run was planned with, in milliseconds.
    pub budget_ms: u64,
}
