//! The core process board: four algorithm cards that run, finish and rest.
//!
//! Each card advances by a random increment scaled to its complexity class.
//! A finished card rests for [`RESET_AFTER`] of clock time and then goes idle
//! again. Like the other market generators the board only moves when ticked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How often a dashboard is expected to tick the board.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1500);
/// How long a finished card stays complete.
pub const RESET_AFTER: Duration = Duration::from_secs(3);
/// Lines of the simulated program being executed.
pub const PROGRAM_LINES: u32 = 150;

const START_PROBABILITY: f64 = 0.2;
const START_PROGRESS: f64 = 5.0;

/// Asymptotic cost of an algorithm, which sets how fast its card fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityClass {
    /// O(1).
    Constant,
    /// O(n log n).
    Linearithmic,
    /// O(m log m), over the contest's bidders.
    BidderLinearithmic,
    /// O(n²).
    Quadratic,
}

impl ComplexityClass {
    /// Upper bound (exclusive) of one tick's progress increment.
    #[must_use]
    pub fn max_increment(self) -> f64 {
        match self {
            Self::Constant => 40.0,
            Self::Linearithmic => 15.0,
            Self::BidderLinearithmic => 20.0,
            Self::Quadratic => 8.0,
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Constant => "O(1)",
            Self::Linearithmic => "O(n log n)",
            Self::BidderLinearithmic => "O(m log m)",
            Self::Quadratic => "O(n²)",
        };
        write!(f, "{s}")
    }
}

/// Where a card is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmStatus {
    /// Waiting to start.
    Idle,
    /// Running.
    Processing,
    /// Finished; resets after [`RESET_AFTER`].
    Complete,
}

/// One algorithm card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Algorithm {
    /// Stable id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Complexity class.
    pub complexity: ComplexityClass,
    /// Cycle position.
    pub status: AlgorithmStatus,
    /// Progress in percent.
    pub progress: f64,
    #[serde(skip)]
    completed_at: Option<Duration>,
}

impl Algorithm {
    fn new(id: &'static str, name: &'static str, complexity: ComplexityClass) -> Self {
        Self {
            id,
            name,
            complexity,
            status: AlgorithmStatus::Idle,
            progress: 0.0,
            completed_at: None,
        }
    }
}

/// A card changing status during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmEvent {
    /// Card id.
    pub id: &'static str,
    /// New status.
    pub status: AlgorithmStatus,
}

/// The simulated program counter shown under the cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// Line being executed, in `[0, PROGRAM_LINES)`.
    pub current_line: u32,
    /// Instructions per second.
    pub execution_speed: f64,
    /// Memory usage in percent.
    pub memory_usage: f64,
}

/// The four algorithm cards and the execution trace.
#[derive(Debug, Clone)]
pub struct AlgorithmBoard {
    rng: StdRng,
    algorithms: Vec<Algorithm>,
    trace: ExecutionTrace,
}

impl AlgorithmBoard {
    /// Creates an idle board with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates an idle board seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            algorithms: vec![
                Algorithm::new("sp1_compilation", "SP1 RISC-V Compilation", ComplexityClass::Linearithmic),
                Algorithm::new("proof_generation", "Zero-Knowledge Proof Generation", ComplexityClass::Quadratic),
                Algorithm::new("contest_resolution", "Proof Contest Resolution", ComplexityClass::BidderLinearithmic),
                Algorithm::new("verification", "Onchain Verification", ComplexityClass::Constant),
            ],
            trace: ExecutionTrace {
                current_line: 0,
                execution_speed: 0.0,
                memory_usage: 0.0,
            },
        }
    }

    /// The cards, in pipeline order.
    #[must_use]
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Looks up a card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Algorithm> {
        self.algorithms.iter().find(|a| a.id == id)
    }

    /// The latest execution trace.
    #[must_use]
    pub fn trace(&self) -> ExecutionTrace {
        self.trace
    }

    /// Advances the board to clock reading `elapsed`.
    ///
    /// Cards whose rest period has run out go idle and sit out this tick.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<AlgorithmEvent> {
        let mut events = Vec::new();

        for algo in &mut self.algorithms {
            match algo.status {
                AlgorithmStatus::Complete => {
                    let done_at = algo.completed_at.unwrap_or(elapsed);
                    if elapsed.saturating_sub(done_at) >= RESET_AFTER {
                        algo.status = AlgorithmStatus::Idle;
                        algo.progress = 0.0;
                        algo.completed_at = None;
                        events.push(AlgorithmEvent { id: algo.id, status: algo.status });
                    }
                }
                AlgorithmStatus::Idle => {
                    if self.rng.gen_bool(START_PROBABILITY) {
                        algo.status = AlgorithmStatus::Processing;
                        algo.progress = START_PROGRESS;
                        events.push(AlgorithmEvent { id: algo.id, status: algo.status });
                    }
                }
                AlgorithmStatus::Processing => {
                    let increment = self.rng.gen_range(0.0..algo.complexity.max_increment());
                    algo.progress = (algo.progress + increment).min(100.0);
                    if algo.progress >= 100.0 {
                        algo.status = AlgorithmStatus::Complete;
                        algo.completed_at = Some(elapsed);
                        events.push(AlgorithmEvent { id: algo.id, status: algo.status });
                    }
                }
            }
        }

        let t = elapsed.as_secs_f64() * 1000.0;
        self.trace = ExecutionTrace {
            current_line: (self.trace.current_line + self.rng.gen_range(1..=5)) % PROGRAM_LINES,
            execution_speed: 800.0 + self.rng.gen_range(0.0..400.0),
            memory_usage: 45.0 + (t / 5000.0).sin() * 15.0,
        };

        events
    }
}
