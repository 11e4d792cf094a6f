//! Cosmetic market data shown beside playback.
//!
//! None of this feeds back into playback. Every generator owns a seeded
//! [`rand::rngs::StdRng`] and advances only when asked, so a host can drive it
//! from any clock and replay a session from its seed.

pub mod algorithms;
pub mod auction;
pub mod feed;
pub mod metrics;
pub mod requests;

pub use algorithms::{
    Algorithm, AlgorithmBoard, AlgorithmEvent, AlgorithmStatus, ComplexityClass, ExecutionTrace,
};
pub use auction::{sample_contest, win_probabilities, ContestEntry, PROVERS};
pub use feed::ActivityFeed;
pub use metrics::{History, MathState, MetricsSampler, NetworkMetrics, PerformancePoint};
pub use requests::{
    BoardEvent, MarketTotals, ProofRequest, RequestBoard, RequestStatus, BADGE_THRESHOLD,
};

/// Network metrics kept in a dashboard history.
pub const NETWORK_HISTORY: usize = 31;
/// Performance points kept in a dashboard history.
pub const PERFORMANCE_HISTORY: usize = 21;
