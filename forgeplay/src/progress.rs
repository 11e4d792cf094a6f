//! Progress projection.

use crate::core::PlaybackState;
use crate::stages::StageTable;

/// Projects a completion percentage from the playback position.
///
/// `100 × (stage_index + lines_emitted / total_lines) / stage_count`, clamped
/// to `[0, 100]`. A stage with no lines contributes no fraction and an empty
/// table projects to zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn project(
    stage_index: usize,
    lines_emitted: usize,
    total_lines: usize,
    stage_count: usize,
) -> f64 {
    if stage_count == 0 {
        return 0.0;
    }
    let fraction = if total_lines == 0 {
        0.0
    } else {
        lines_emitted as f64 / total_lines as f64
    };
    let percent = 100.0 * (stage_index as f64 + fraction) / stage_count as f64;
    percent.clamp(0.0, 100.0)
}

/// Projects the percentage of a run's state against its table.
#[must_use]
pub fn project_state(state: &PlaybackState, table: &StageTable) -> f64 {
    let index = state.current_stage_index();
    let total = table.get(index).map_or(0, |s| s.line_count());
    project(index, state.lines_in_stage(), total, table.len())
}
