//! Seeded, clock-driven dashboard metrics.
//!
//! Every value is a function of the elapsed clock passed in plus draws from
//! the sampler's own RNG, so a seeded sampler replays exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Lower bound of the active prover count.
pub const MIN_ACTIVE_PROVERS: u32 = 12;
/// Upper bound of the active prover count.
pub const MAX_ACTIVE_PROVERS: u32 = 35;

/// One sample of network-level metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Clock reading the sample was taken at, in milliseconds.
    pub timestamp_ms: u64,
    /// Proofs per minute.
    pub throughput: f64,
    /// Network efficiency in percent.
    pub efficiency: f64,
    /// Average cost per proof.
    pub cost_per_proof: f64,
    /// Provers currently online.
    pub active_provers: u32,
    /// Running proof contests.
    pub contest_count: u32,
    /// Contest win rate in percent.
    pub win_rate: f64,
    /// Collateral pool size.
    pub collateral_pool: f64,
}

/// One sample of the "mathematical engine" panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MathState {
    /// Proof complexity in `[0, 100]`.
    pub proof_complexity: f64,
    /// Network efficiency in `[70, 100]`.
    pub network_efficiency: f64,
    /// Contest probability in percent.
    pub contest_probability: f64,
    /// Exponential moving average of the collateral ratio.
    pub collateral_ratio: f64,
    /// Cycle optimization in `[80, 100]`.
    pub cycle_optimization: f64,
}

impl MathState {
    /// Derived chart point: throughput and cost follow complexity and efficiency.
    #[must_use]
    pub fn performance(&self, timestamp_ms: u64) -> PerformancePoint {
        PerformancePoint {
            time: timestamp_ms % 100_000,
            efficiency: self.network_efficiency,
            throughput: self.proof_complexity * self.network_efficiency / 100.0,
            cost: (100.0 - self.network_efficiency) * 0.1,
        }
    }
}

/// A point of the performance chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    /// Clock reading modulo 100 s.
    pub time: u64,
    /// Efficiency in percent.
    pub efficiency: f64,
    /// Derived throughput.
    pub throughput: f64,
    /// Derived cost.
    pub cost: f64,
}

/// Produces metrics on demand from a clock reading and a seeded RNG.
#[derive(Debug, Clone)]
pub struct MetricsSampler {
    rng: StdRng,
    active_provers: u32,
    collateral_ratio: f64,
    cycle_optimization: f64,
}

impl MetricsSampler {
    /// Creates a sampler with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a sampler seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let active_provers = rng.gen_range(15..MAX_ACTIVE_PROVERS);
        Self {
            rng,
            active_provers,
            collateral_ratio: 2.5,
            cycle_optimization: 92.0,
        }
    }

    /// Current active prover count.
    #[must_use]
    pub fn active_provers(&self) -> u32 {
        self.active_provers
    }

    /// Samples network metrics at `elapsed`.
    ///
    /// Also steps the active prover random walk by ±1 within
    /// `[MIN_ACTIVE_PROVERS, MAX_ACTIVE_PROVERS]`.
    pub fn sample(&mut self, elapsed: Duration) -> NetworkMetrics {
        let t = elapsed.as_secs_f64() * 1000.0;
        let throughput = 25.0 + (t / 10_000.0).sin() * 15.0 + self.rng.gen_range(0.0..10.0);
        let contest_count = self.rng.gen_range(3..=10);

        let metrics = NetworkMetrics {
            timestamp_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            throughput,
            efficiency: 88.0 + (t / 8000.0).cos() * 8.0,
            cost_per_proof: 1.8 + (t / 12_000.0).sin() * 0.5,
            active_provers: self.active_provers,
            contest_count,
            win_rate: 15.0 + (t / 15_000.0).sin() * 10.0,
            collateral_pool: 250.0 + (t / 20_000.0).cos() * 50.0,
        };

        let stepped = if self.rng.gen_bool(0.5) {
            self.active_provers + 1
        } else {
            self.active_provers.saturating_sub(1)
        };
        self.active_provers = stepped.clamp(MIN_ACTIVE_PROVERS, MAX_ACTIVE_PROVERS);

        metrics
    }

    /// Samples the mathematical engine panel at `elapsed`.
    pub fn sample_math(&mut self, elapsed: Duration) -> MathState {
        let t = elapsed.as_secs_f64() * 1000.0;

        // Beta-shaped draw with alpha = 2, beta = 5.
        let (u1, u2): (f64, f64) = (self.rng.gen(), self.rng.gen());
        let contest_probability = u1.powf(1.0 / 2.0) * u2.powf(1.0 / 5.0) * 100.0;

        self.collateral_ratio =
            self.collateral_ratio * 0.9 + (2.0 + self.rng.gen::<f64>()) * 0.1;

        let learning_rate = 0.01;
        let gradient = (t / 5000.0).sin() * 10.0;
        self.cycle_optimization =
            (self.cycle_optimization + learning_rate * gradient).clamp(80.0, 100.0);

        MathState {
            proof_complexity: (t / 10_000.0).sin() * 50.0 + 50.0,
            network_efficiency: 85.0 + (t / 8000.0).cos() * 15.0,
            contest_probability,
            collateral_ratio: self.collateral_ratio,
            cycle_optimization: self.cycle_optimization,
        }
    }
}

/// A bounded history that drops its oldest entry when full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> History<T> {
    /// Creates a history holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends an item, evicting the oldest if needed.
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Number of retained items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The newest item.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}
