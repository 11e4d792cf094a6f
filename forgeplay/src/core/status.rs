//! Sequencer state enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a playback run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    /// No run has started.
    Idle,
    /// Emitting the lines of the stage at this index.
    RunningStage(usize),
    /// All stages have emitted their lines.
    Complete,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::RunningStage(index) => write!(f, "running_stage({index})"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl SequencerState {
    /// Returns true once every stage has finished.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns true while a stage is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::RunningStage(_))
    }

    /// Returns the index of the running stage, if any.
    #[must_use]
    pub fn stage_index(&self) -> Option<usize> {
        match self {
            Self::RunningStage(index) => Some(*index),
            _ => None,
        }
    }
}
