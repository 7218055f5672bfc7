use log::debug;
use tokio_util::sync::CancellationToken;

use super::Block;
use super::hash::{Preimage, meets_difficulty};
use crate::checkout::BookCheckout;
use crate::error::{ChainError, Result};

/// How many nonces are tried between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Proof-of-Work search: find a nonce whose digest has `difficulty` leading
/// hex zeros. Holds no chain state; callers hand it a snapshot of the tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Miner {
    max_attempts: Option<u64>,
}

impl Miner {
    /// `max_attempts = None` searches until the nonce space runs out.
    pub fn new(max_attempts: Option<u64>) -> Self {
        Self { max_attempts }
    }

    /// Build a successor of `previous` carrying `payload` and seal it.
    pub fn mine(
        &self,
        previous: &Block,
        payload: BookCheckout,
        difficulty: u32,
        cancel: &CancellationToken,
    ) -> Result<Block> {
        let candidate = Block::candidate(previous, payload, difficulty);
        self.resume(candidate, 0, cancel)
    }

    /// Continue searching on an already-built candidate starting at `from`.
    ///
    /// The candidate keeps its timestamp, so a search stopped by
    /// `MiningExhausted` can be picked up again at `next_nonce`.
    pub fn resume(
        &self,
        mut candidate: Block,
        from: u64,
        cancel: &CancellationToken,
    ) -> Result<Block> {
        let preimage = Preimage::of(&candidate)?;
        let mut nonce = from;
        let mut attempts: u64 = 0;

        loop {
            if let Some(limit) = self.max_attempts {
                if attempts >= limit {
                    return Err(ChainError::MiningExhausted {
                        attempts,
                        difficulty: candidate.difficulty,
                        next_nonce: Some(nonce),
                    });
                }
            }
            if attempts % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                debug!(
                    "MINER - abandoning #{} after {} attempts: predecessor superseded",
                    candidate.position, attempts
                );
                return Err(ChainError::MiningCancelled {
                    attempts,
                    position: candidate.position - 1,
                });
            }

            let hash = preimage.digest(nonce);
            attempts += 1;
            if meets_difficulty(&hash, candidate.difficulty) {
                candidate.nonce = nonce;
                candidate.hash = hash;
                debug!(
                    "MINER - sealed #{} (nonce={:x}, attempts={}, difficulty={})",
                    candidate.position, nonce, attempts, candidate.difficulty
                );
                return Ok(candidate);
            }

            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => {
                    return Err(ChainError::MiningExhausted {
                        attempts,
                        difficulty: candidate.difficulty,
                        next_nonce: None,
                    });
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Miner;
    use crate::blockchain::Block;
    use crate::blockchain::hash::{digest, meets_difficulty};
    use crate::checkout::BookCheckout;
    use crate::error::ChainError;
    use tokio_util::sync::CancellationToken;

    fn payload() -> BookCheckout {
        BookCheckout::new("Book A", "Author", "2001-01-01", "978-0", "Alice", "2024-05-01")
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let genesis = Block::genesis().unwrap();
        let b = Miner::default()
            .mine(&genesis, payload(), 2, &CancellationToken::new())
            .unwrap();
        assert!(b.hash.starts_with("00"));
        assert_eq!(b.hash, digest(&b).unwrap());
        assert!(b.has_valid_work());
        assert_eq!(b.previous_hash, genesis.hash);
    }

    #[test]
    fn first_solution_is_the_smallest_nonce() {
        let genesis = Block::genesis().unwrap();
        let b = Miner::default()
            .mine(&genesis, payload(), 2, &CancellationToken::new())
            .unwrap();
        for nonce in 0..b.nonce {
            let mut earlier = b.clone();
            earlier.nonce = nonce;
            assert!(!meets_difficulty(&digest(&earlier).unwrap(), 2));
        }
    }

    #[test]
    fn attempt_ceiling_reports_resume_point() {
        let genesis = Block::genesis().unwrap();
        let candidate = Block::candidate(&genesis, payload(), 64);
        let err = Miner::new(Some(10))
            .resume(candidate, 5, &CancellationToken::new())
            .unwrap_err();
        match err {
            ChainError::MiningExhausted {
                attempts,
                difficulty,
                next_nonce,
            } => {
                assert_eq!(attempts, 10);
                assert_eq!(difficulty, 64);
                assert_eq!(next_nonce, Some(15));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resume_continues_the_same_search() {
        let genesis = Block::genesis().unwrap();
        let candidate = Block::candidate(&genesis, payload(), 2);
        let cancel = CancellationToken::new();

        let full = Miner::default().resume(candidate.clone(), 0, &cancel).unwrap();
        let mut from = 0;
        let resumed = loop {
            match Miner::new(Some(7)).resume(candidate.clone(), from, &cancel) {
                Ok(b) => break b,
                Err(ChainError::MiningExhausted {
                    next_nonce: Some(n),
                    ..
                }) => from = n,
                Err(other) => panic!("unexpected error: {other}"),
            }
        };
        assert_eq!(full, resumed);
    }

    #[test]
    fn nonce_overflow_is_exhaustion_not_wraparound() {
        let genesis = Block::genesis().unwrap();
        let candidate = Block::candidate(&genesis, payload(), 64);
        let err = Miner::default()
            .resume(candidate, u64::MAX - 2, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ChainError::MiningExhausted {
                attempts: 3,
                next_nonce: None,
                ..
            }
        ));
    }

    #[test]
    fn cancelled_search_stops() {
        let genesis = Block::genesis().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = Miner::default()
            .mine(&genesis, payload(), 64, &cancel)
            .unwrap_err();
        assert!(matches!(
            err,
            ChainError::MiningCancelled {
                attempts: 0,
                position: -1
            }
        ));
    }
}
