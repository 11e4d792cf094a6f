//! All-pay proof contests.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Provers that take part in sampled contests.
pub const PROVERS: [&str; 5] = ["Avidaith", "0xCrashout", "Uma", "Kshitij", "Mallesh"];

/// Smallest sampled bid.
pub const MIN_BID: f64 = 1.0;
/// Upper bound (exclusive) of sampled bids.
pub const MAX_BID: f64 = 6.0;

/// One prover's bid and resulting win chance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestEntry {
    /// Bidder name.
    pub prover: String,
    /// Bid amount.
    pub bid: f64,
    /// Win probability in percent.
    pub probability: f64,
}

/// Win probability of each bid in percent: `b_i^α / Σ b_j^α × 100`.
///
/// An empty pool yields an empty vector; a pool whose weights sum to zero
/// yields all zeros.
#[must_use]
pub fn win_probabilities(bids: &[f64], alpha: f64) -> Vec<f64> {
    let weights: Vec<f64> = bids.iter().map(|bid| bid.max(0.0).powf(alpha)).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return vec![0.0; bids.len()];
    }
    weights.iter().map(|w| w / total * 100.0).collect()
}

/// Draws a bid in `[MIN_BID, MAX_BID)` for every prover and scores the pool
/// with α = 1.
pub fn sample_contest<R: Rng + ?Sized>(rng: &mut R, provers: &[&str]) -> Vec<ContestEntry> {
    let bids: Vec<f64> = provers
        .iter()
        .map(|_| rng.gen_range(MIN_BID..MAX_BID))
        .collect();
    let probabilities = win_probabilities(&bids, 1.0);

    provers
        .iter()
        .zip(bids)
        .zip(probabilities)
        .map(|((prover, bid), probability)| ContestEntry {
            prover: (*prover).to_string(),
            bid,
            probability,
        })
        .collect()
}

/// The entry with the highest win chance.
#[must_use]
pub fn favourite(entries: &[ContestEntry]) -> Option<&ContestEntry> {
    entries
        .iter()
        .max_by(|a, b| a.probability.total_cmp(&b.probability))
}
