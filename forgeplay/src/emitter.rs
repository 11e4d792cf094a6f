//! Log emitter: plays one stage's lines on a jittered timer.

use crate::config::JitterRange;
use crate::core::PlaybackState;
use crate::stages::Stage;
use rand::Rng;
use std::time::Duration;

/// Result of emitting one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emitted {
    /// Index of the line within its stage.
    pub line_index: usize,
    /// True when this was the last line of the stage.
    pub stage_done: bool,
}

/// Emits the lines of a single stage, one per timer expiry.
///
/// Delays are planned up front so a seeded run is fully replayable: each
/// line waits `budget / line_count`, scaled by a multiplier drawn from the
/// jitter range.
#[derive(Debug, Clone)]
pub struct LogEmitter {
    stage_index: usize,
    delays: Vec<Duration>,
    cursor: usize,
}

impl LogEmitter {
    /// Plans the line delays of `stage` within `budget`.
    #[allow(clippy::cast_precision_loss)]
    pub fn plan<R: Rng + ?Sized>(
        stage_index: usize,
        stage: &Stage,
        budget: Duration,
        jitter: Option<JitterRange>,
        rng: &mut R,
    ) -> Self {
        let count = stage.line_count();
        let base = if count == 0 {
            Duration::ZERO
        } else {
            budget.div_f64(count as f64)
        };
        let delays = (0..count)
            .map(|_| match jitter {
                Some(range) if range.min < range.max => {
                    scale(base, rng.gen_range(range.min..range.max))
                }
                Some(range) => scale(base, range.min),
                None => base,
            })
            .collect();

        Self {
            stage_index,
            delays,
            cursor: 0,
        }
    }

    /// Index of the stage being emitted.
    #[must_use]
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// Delay before the next line, or `None` once the stage is done.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.delays.get(self.cursor).copied()
    }

    /// The full planned delay sequence.
    #[must_use]
    pub fn planned_delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Number of lines not yet emitted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.delays.len() - self.cursor
    }

    /// True once every line has been emitted.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.delays.len()
    }

    /// Appends the next line of `stage` to `state`.
    ///
    /// Returns `None` when the stage has already been fully emitted.
    pub fn emit(&mut self, stage: &Stage, state: &mut PlaybackState) -> Option<Emitted> {
        let line_index = self.cursor;
        let text = stage.lines().get(line_index)?;
        state.append_line(text);
        self.cursor += 1;
        Some(Emitted {
            line_index,
            stage_done: self.is_done(),
        })
    }
}

/// `base × factor`, saturating instead of panicking on overflow.
fn scale(base: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(base.as_secs_f64() * factor.max(0.0)).unwrap_or(Duration::MAX)
}
