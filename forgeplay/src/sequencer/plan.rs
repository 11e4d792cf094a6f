//! Per-run time budgets.

use crate::config::DurationPolicy;
use crate::stages::StageTable;
use rand::Rng;
use std::time::Duration;

/// The line budget of every stage of one run, drawn once at run start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    stage_budgets: Vec<Duration>,
}

impl RunPlan {
    /// Draws the budgets for `table` under `policy`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw<R: Rng + ?Sized>(policy: &DurationPolicy, table: &StageTable, rng: &mut R) -> Self {
        let stage_budgets = match *policy {
            DurationPolicy::RandomizedTotal { min_ms, max_ms } => {
                let total_ms = if min_ms >= max_ms {
                    max_ms
                } else {
                    rng.gen_range(min_ms..=max_ms)
                };
                let per_stage = Duration::from_millis(total_ms) / table.len() as u32;
                vec![per_stage; table.len()]
            }
            DurationPolicy::FixedPerStage { stage_ms } => {
                vec![Duration::from_millis(stage_ms); table.len()]
            }
            DurationPolicy::FixedPerLine { line_ms } => table
                .iter()
                .map(|stage| Duration::from_millis(line_ms) * stage.line_count() as u32)
                .collect(),
        };
        Self { stage_budgets }
    }

    /// Budget of the stage at `index`.
    #[must_use]
    pub fn stage_budget(&self, index: usize) -> Duration {
        self.stage_budgets.get(index).copied().unwrap_or_default()
    }

    /// Sum of all stage budgets, before jitter.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.stage_budgets.iter().sum()
    }

    /// Total budget in whole milliseconds.
    #[must_use]
    pub fn total_ms(&self) -> u64 {
        u64::try_from(self.total().as_millis()).unwrap_or(u64::MAX)
    }
}
