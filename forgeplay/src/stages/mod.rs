//! Stage definitions and stage tables.
//!
//! A [`StageTable`] is the immutable, ordered list of stages a playback run
//! walks through. Tables are validated on construction and cheap to clone.

mod catalog;

pub use catalog::{badge_forge, zk_computation};

use crate::errors::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::sync::Arc;

/// One labeled phase of a simulated process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    label: String,
    lines: Vec<String>,
}

impl Stage {
    /// Creates a stage from a label and its log lines.
    pub fn new<I, S>(label: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The ordered log lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of log lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Short label made of the first two words, as shown under step icons.
    #[must_use]
    pub fn short_label(&self) -> String {
        self.label.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
    }
}

/// An ordered, non-empty sequence of non-empty stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageTable {
    stages: Arc<[Stage]>,
}

impl StageTable {
    /// Builds a table, rejecting an empty table or a stage without lines.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(PlaybackError::EmptyStageTable);
        }
        if let Some(empty) = stages.iter().find(|s| s.lines.is_empty()) {
            return Err(PlaybackError::EmptyStage {
                label: empty.label.clone(),
            });
        }
        Ok(Self {
            stages: stages.into(),
        })
    }

    /// Parses and validates a table from JSON (`[{"label": .., "lines": [..]}]`).
    pub fn from_json(json: &str) -> Result<Self> {
        let stages: Vec<Stage> = serde_json::from_str(json)?;
        Self::new(stages)
    }

    /// Number of stages (N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; tables hold at least one stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Iterates stages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Total number of lines across all stages.
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.stages.iter().map(Stage::line_count).sum()
    }

    /// Every line of every stage, in playback order.
    #[must_use]
    pub fn all_lines(&self) -> Vec<String> {
        self.stages
            .iter()
            .flat_map(|s| s.lines.iter().cloned())
            .collect()
    }
}

impl Index<usize> for StageTable {
    type Output = Stage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.stages[index]
    }
}
