//! The proof request board.
//!
//! Requests move `Pending → Bidding → Proving → Complete` one [`RequestBoard::tick`]
//! at a time. Proving speed falls with the square root of a program's
//! complexity; bidding speed rises with the fee.

use crate::errors::{PlaybackError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Requests kept on the board.
pub const BOARD_CAPACITY: usize = 6;
/// Completed user proofs needed to unlock the forge badge.
pub const BADGE_THRESHOLD: u32 = 3;
/// Proof count the network starts from.
pub const INITIAL_TOTAL_PROOFS: u64 = 147;

const PENDING_TO_BIDDING: f64 = 0.3;
const SPAWN_PROBABILITY: f64 = 0.08;
const BIDDING_CAP: f64 = 35.0;
/// Bids are roughly 40% of the fee.
const BID_SHARE: f64 = 0.4;

/// Users that post requests on their own.
pub const USERS: [&str; 5] = ["0xCrashout", "Avidaith", "Uma", "Kshitij", "Mallesh"];
/// Requester name for requests submitted from the terminal.
pub const TERMINAL_USER: &str = "Anonymous_Hacker";

/// A program that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program {
    /// Display name.
    pub name: &'static str,
    /// Constraint count.
    pub complexity: u64,
    /// Cycle count.
    pub cycles: u64,
}

/// Programs spawned requests are drawn from.
pub const PROGRAMS: [Program; 5] = [
    Program { name: "ZK Rollup Batch", complexity: 320_000, cycles: 2_100_000 },
    Program { name: "Private Voting Proof", complexity: 180_000, cycles: 950_000 },
    Program { name: "Cross-chain Bridge", complexity: 420_000, cycles: 2_800_000 },
    Program { name: "AI Model Verification", complexity: 680_000, cycles: 4_200_000 },
    Program { name: "Identity Credential", complexity: 150_000, cycles: 800_000 },
];

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Waiting for bids.
    Pending,
    /// Provers are bidding.
    Bidding,
    /// The winner is generating the proof.
    Proving,
    /// Proof delivered.
    Complete,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Bidding => "bidding",
            Self::Proving => "proving",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// A proof request on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofRequest {
    /// Short hex id, `0x` plus four digits.
    pub id: String,
    /// Requester.
    pub user: String,
    /// Requested program.
    pub program: String,
    /// Offered fee.
    pub fee: f64,
    /// Lifecycle position.
    pub status: RequestStatus,
    /// Progress in percent.
    pub progress: f64,
    /// Constraint count.
    pub complexity: u64,
    /// Cycle count.
    pub cycle_count: u64,
}

impl ProofRequest {
    /// Advances one tick. Returns true if the status changed.
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.status {
            RequestStatus::Pending => {
                if rng.gen_bool(PENDING_TO_BIDDING) {
                    self.status = RequestStatus::Bidding;
                    self.progress = 10.0;
                    return true;
                }
            }
            RequestStatus::Bidding => {
                let increment = rng.gen_range(0.0..20.0) * (self.fee / 2.5);
                self.progress = (self.progress + increment).min(BIDDING_CAP);
                if self.progress >= BIDDING_CAP {
                    self.status = RequestStatus::Proving;
                    return true;
                }
            }
            RequestStatus::Proving => {
                #[allow(clippy::cast_precision_loss)]
                let complexity_factor = (self.complexity as f64 / 100_000.0).sqrt().max(f64::EPSILON);
                let increment = rng.gen_range(0.0..15.0) / complexity_factor;
                self.progress = (self.progress + increment).min(100.0);
                if self.progress >= 100.0 {
                    self.status = RequestStatus::Complete;
                    return true;
                }
            }
            RequestStatus::Complete => {}
        }
        false
    }
}

/// Running market totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTotals {
    /// Proofs delivered network-wide.
    pub total_proofs: u64,
    /// Fees earned by provers.
    pub total_revenue: f64,
    /// Smoothed bid size.
    pub avg_bid_size: f64,
}

impl Default for MarketTotals {
    fn default() -> Self {
        Self {
            total_proofs: INITIAL_TOTAL_PROOFS,
            total_revenue: 0.0,
            avg_bid_size: 0.0,
        }
    }
}

impl MarketTotals {
    fn credit(&mut self, fee: f64) {
        self.total_proofs += 1;
        self.total_revenue += fee;
        self.avg_bid_size = (self.avg_bid_size + fee * BID_SHARE) / 2.0;
    }
}

/// A status change observed during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A request moved to a new status.
    StatusChanged {
        /// Request id.
        id: String,
        /// New status.
        status: RequestStatus,
    },
    /// A new request was posted.
    Spawned {
        /// Request id.
        id: String,
        /// Requested program.
        program: String,
    },
}

/// The bounded board of proof requests.
#[derive(Debug, Clone)]
pub struct RequestBoard {
    rng: StdRng,
    requests: VecDeque<ProofRequest>,
    totals: MarketTotals,
    user_proofs: u32,
}

impl RequestBoard {
    /// Creates a board seeded with `seed` and the three demo requests.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a board seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        let requests = [
            ("0x1a2b", "0xCrashout", "Rollup State Transition", 2.5, RequestStatus::Proving, 65.0, 245_000, 1_500_000),
            ("0x3c4d", "Avidaith", "Private Identity Proof", 1.8, RequestStatus::Bidding, 25.0, 180_000, 900_000),
            ("0x5e6f", "Uma", "AI Inference Verification", 4.2, RequestStatus::Pending, 0.0, 580_000, 3_200_000),
        ]
        .into_iter()
        .map(
            |(id, user, program, fee, status, progress, complexity, cycle_count)| ProofRequest {
                id: id.to_string(),
                user: user.to_string(),
                program: program.to_string(),
                fee,
                status,
                progress,
                complexity,
                cycle_count,
            },
        )
        .collect();

        Self {
            rng,
            requests,
            totals: MarketTotals::default(),
            user_proofs: 0,
        }
    }

    /// Requests, oldest first.
    pub fn requests(&self) -> impl Iterator<Item = &ProofRequest> {
        self.requests.iter()
    }

    /// Number of requests on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True if the board is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Looks up a request by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProofRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Running totals.
    #[must_use]
    pub fn totals(&self) -> &MarketTotals {
        &self.totals
    }

    /// Advances every request one step and maybe posts a new one.
    pub fn tick(&mut self) -> Vec<BoardEvent> {
        let mut events = Vec::new();

        for request in &mut self.requests {
            if request.advance(&mut self.rng) {
                if request.status == RequestStatus::Complete {
                    self.totals.credit(request.fee);
                }
                events.push(BoardEvent::StatusChanged {
                    id: request.id.clone(),
                    status: request.status,
                });
            }
        }

        if self.rng.gen_bool(SPAWN_PROBABILITY) {
            let request = self.spawn();
            events.push(BoardEvent::Spawned {
                id: request.id.clone(),
                program: request.program.clone(),
            });
            self.push(request);
        }

        events
    }

    fn spawn(&mut self) -> ProofRequest {
        let program = PROGRAMS[self.rng.gen_range(0..PROGRAMS.len())];
        let user = USERS[self.rng.gen_range(0..USERS.len())];
        ProofRequest {
            id: self.next_id(),
            user: user.to_string(),
            program: program.name.to_string(),
            fee: self.rng.gen_range(1.2..4.2),
            status: RequestStatus::Pending,
            progress: 0.0,
            complexity: program.complexity,
            cycle_count: program.cycles,
        }
    }

    /// Posts a request from the terminal.
    ///
    /// The program may be any name; its complexity and cycle count are drawn
    /// at random.
    pub fn submit(&mut self, program: &str, fee: f64) -> Result<ProofRequest> {
        let program = program.trim();
        if program.is_empty() {
            return Err(PlaybackError::InvalidRequest("program must not be empty".into()));
        }
        if !fee.is_finite() || fee <= 0.0 {
            return Err(PlaybackError::InvalidRequest(format!(
                "fee must be a positive number, got {fee}"
            )));
        }

        let request = ProofRequest {
            id: self.next_id(),
            user: TERMINAL_USER.to_string(),
            program: program.to_string(),
            fee,
            status: RequestStatus::Pending,
            progress: 0.0,
            complexity: self.rng.gen_range(100_000..600_000),
            cycle_count: self.rng.gen_range(500_000..2_500_000),
        };
        self.push(request.clone());
        Ok(request)
    }

    /// Credits a delivered terminal request.
    ///
    /// Returns true the first time the badge threshold is reached.
    pub fn credit_user_proof(&mut self, fee: f64) -> bool {
        self.totals.credit(fee);
        self.user_proofs += 1;
        self.user_proofs == BADGE_THRESHOLD
    }

    /// Terminal requests delivered so far.
    #[must_use]
    pub fn user_proofs(&self) -> u32 {
        self.user_proofs
    }

    /// Terminal proofs still needed for the badge.
    #[must_use]
    pub fn remaining_for_badge(&self) -> u32 {
        BADGE_THRESHOLD.saturating_sub(self.user_proofs)
    }

    /// Whether the forge badge is unlocked.
    #[must_use]
    pub fn badge_unlocked(&self) -> bool {
        self.user_proofs >= BADGE_THRESHOLD
    }

    fn push(&mut self, request: ProofRequest) {
        self.requests.push_back(request);
        while self.requests.len() > BOARD_CAPACITY {
            self.requests.pop_front();
        }
    }

    fn next_id(&mut self) -> String {
        format!("0x{:04x}", self.rng.gen_range(0..=0xffff_u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(status: RequestStatus, progress: f64, fee: f64, complexity: u64) -> ProofRequest {
        ProofRequest {
            id: "0x0000".to_string(),
            user: "Uma".to_string(),
            program: "Test".to_string(),
            fee,
            status,
            progress,
            complexity,
            cycle_count: 1,
        }
    }

    #[test]
    fn test_new_board_has_demo_requests() {
        let board = RequestBoard::new(1);
        assert_eq!(board.len(), 3);
        assert_eq!(board.get("0x1a2b").map(|r| r.status), Some(RequestStatus::Proving));
        assert_eq!(board.totals().total_proofs, INITIAL_TOTAL_PROOFS);
    }

    #[test]
    fn test_bidding_caps_at_35_then_proving() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut req = request(RequestStatus::Bidding, 10.0, 4.0, 100_000);
        for _ in 0..1000 {
            req.advance(&mut rng);
            assert!(req.progress <= BIDDING_CAP);
            if req.status != RequestStatus::Bidding {
                break;
            }
        }
        assert_eq!(req.status, RequestStatus::Proving);
        assert!((req.progress - BIDDING_CAP).abs() < f64::EPSILON);
    }

    #[test]
    fn test_proving_completes_at_100() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut req = request(RequestStatus::Proving, 35.0, 2.0, 400_000);
        let mut ticks = 0;
        while req.status == RequestStatus::Proving && ticks < 10_000 {
            req.advance(&mut rng);
            ticks += 1;
        }
        assert_eq!(req.status, RequestStatus::Complete);
        assert!((req.progress - 100.0).abs() < f64::EPSILON);
        assert!(!req.advance(&mut rng));
    }

    #[test]
    fn test_complexity_slows_proving() {
        let run = |complexity| {
            let mut rng = StdRng::seed_from_u64(12);
            let mut req = request(RequestStatus::Proving, 35.0, 2.0, complexity);
            let mut ticks = 0;
            while req.status == RequestStatus::Proving {
                req.advance(&mut rng);
                ticks += 1;
            }
            ticks
        };
        assert!(run(900_000) > run(100_000));
    }

    #[test]
    fn test_board_stays_bounded_and_credits_totals() {
        let mut board = RequestBoard::new(7);
        let mut completions = 0;
        for _ in 0..2000 {
            for event in board.tick() {
                if let BoardEvent::StatusChanged {
                    status: RequestStatus::Complete,
                    ..
                } = event
                {
                    completions += 1;
                }
            }
            assert!(board.len() <= BOARD_CAPACITY);
        }
        assert!(completions > 0);
        assert_eq!(board.totals().total_proofs, INITIAL_TOTAL_PROOFS + completions);
        assert!(board.totals().total_revenue > 0.0);
    }

    #[test]
    fn test_seeded_boards_replay() {
        let mut a = RequestBoard::new(99);
        let mut b = RequestBoard::new(99);
        for _ in 0..100 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.requests().collect::<Vec<_>>(), b.requests().collect::<Vec<_>>());
    }

    #[test]
    fn test_submit_validates_and_posts() {
        let mut board = RequestBoard::new(3);
        assert!(board.submit("  ", 1.0).is_err());
        assert!(board.submit("Rollup", 0.0).is_err());
        assert!(board.submit("Rollup", f64::NAN).is_err());

        let req = board.submit("Rollup", 2.0).unwrap();
        assert_eq!(req.user, TERMINAL_USER);
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(req.id.starts_with("0x") && req.id.len() == 6);
        assert!((100_000..600_000).contains(&req.complexity));
        assert!((500_000..2_500_000).contains(&req.cycle_count));
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn test_badge_unlocks_once_at_threshold() {
        let mut board = RequestBoard::new(3);
        assert_eq!(board.remaining_for_badge(), 3);
        assert!(!board.credit_user_proof(2.0));
        assert!(!board.credit_user_proof(2.0));
        assert!(board.credit_user_proof(2.0));
        assert!(board.badge_unlocked());
        assert!(!board.credit_user_proof(2.0));
        assert_eq!(board.remaining_for_badge(), 0);
        assert_eq!(board.totals().total_proofs, INITIAL_TOTAL_PROOFS + 4);
    }

    #[test]
    fn test_average_bid_smoothing() {
        let mut totals = MarketTotals::default();
        totals.credit(2.5);
        assert!((totals.avg_bid_size - 0.5).abs() < 1e-9);
        totals.credit(2.5);
        assert!((totals.avg_bid_size - 0.75).abs() < 1e-9);
    }
}
