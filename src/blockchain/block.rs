use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GENESIS_POSITION;
use super::hash;
use crate::checkout::BookCheckout;
use crate::error::Result;

/// A single sealed checkout record in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub position: i64,
    pub payload: BookCheckout,
    pub timestamp: DateTime<Utc>, // captured once at construction
    pub previous_hash: String,
    pub nonce: u64,      // Proof-of-Work nonce
    pub difficulty: u32, // leading hex zeros required when this block was mined
    pub hash: String,
}

impl Block {
    /// Create the genesis block (root of the chain).
    ///
    /// Genesis is not mined: it carries difficulty 0, which the empty prefix
    /// satisfies, so the work check applies to it like any other block.
    pub fn genesis() -> Result<Self> {
        let mut block = Self {
            position: GENESIS_POSITION,
            payload: BookCheckout::genesis(),
            timestamp: Utc::now(),
            previous_hash: String::new(),
            nonce: 0,
            difficulty: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// Build an unsealed successor of `previous`. Call `Miner::resume` or
    /// `Miner::mine` to perform the Proof-of-Work.
    pub fn candidate(previous: &Block, payload: BookCheckout, difficulty: u32) -> Self {
        Self {
            position: previous.position + 1,
            payload,
            timestamp: Utc::now(),
            previous_hash: previous.hash.clone(),
            nonce: 0,
            difficulty,
            hash: String::new(),
        }
    }

    /// Recompute the digest from the block's own fields (excluding `hash`).
    pub fn compute_hash(&self) -> Result<String> {
        hash::digest(self)
    }

    /// Whether the stored hash satisfies the block's own difficulty.
    pub fn has_valid_work(&self) -> bool {
        hash::meets_difficulty(&self.hash, self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::blockchain::GENESIS_POSITION;
    use crate::checkout::BookCheckout;

    #[test]
    fn genesis_has_valid_hash() {
        let g = Block::genesis().unwrap();
        assert_eq!(g.hash, g.compute_hash().unwrap());
        assert_eq!(g.position, GENESIS_POSITION);
        assert!(g.previous_hash.is_empty());
        assert!(g.payload.is_genesis);
        assert!(g.has_valid_work());
    }

    #[test]
    fn candidate_links_to_previous() {
        let g = Block::genesis().unwrap();
        let payload = BookCheckout::new("Book A", "Author", "2001-01-01", "978-0", "Alice", "2024-05-01");
        let c = Block::candidate(&g, payload, 3);
        assert_eq!(c.position, g.position + 1);
        assert_eq!(c.previous_hash, g.hash);
        assert_eq!(c.difficulty, 3);
        assert!(c.hash.is_empty());
    }
}
