//! Stage sequencing.
//!
//! The [`Sequencer`] moves `Idle → RunningStage(0) → … → RunningStage(N-1) →
//! Complete`, and asks for the completion notification after the terminal
//! delay. [`RunPlan`] holds the per-stage budgets drawn at run start.

mod machine;
mod plan;

pub use machine::{Sequencer, SequencerEvent, Timer, TimerKind};
pub use plan::RunPlan;
