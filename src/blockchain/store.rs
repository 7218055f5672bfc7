use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use super::validation::{validate_block, validate_chain};
use super::{Block, DifficultyController};
use crate::error::{ChainError, Result};

/// The current tail plus a token that fires once it stops being the tail.
#[derive(Debug, Clone)]
pub struct ChainHead {
    pub block: Block,
    pub superseded: CancellationToken,
}

#[derive(Debug)]
struct ChainInner {
    blocks: Vec<Block>,
    tail_token: CancellationToken,
}

/// The authoritative in-memory chain. Appends are serialized by the write
/// lock; reads only take the read lock.
#[derive(Debug)]
pub struct ChainStore {
    inner: RwLock<ChainInner>,
    difficulty: Arc<DifficultyController>,
}

impl ChainStore {
    /// Create a store seeded with a fresh genesis block.
    pub fn with_genesis(difficulty: Arc<DifficultyController>) -> Result<Self> {
        let genesis = Block::genesis()?;
        info!("CHAIN - genesis created (hash={})", genesis.hash);
        Ok(Self {
            inner: RwLock::new(ChainInner {
                blocks: vec![genesis],
                tail_token: CancellationToken::new(),
            }),
            difficulty,
        })
    }

    #[cfg(test)]
    fn empty(difficulty: Arc<DifficultyController>) -> Self {
        Self {
            inner: RwLock::new(ChainInner {
                blocks: Vec::new(),
                tail_token: CancellationToken::new(),
            }),
            difficulty,
        }
    }

    /// Return the last accepted block.
    pub fn tail(&self) -> Result<Block> {
        self.inner
            .read()
            .blocks
            .last()
            .cloned()
            .ok_or(ChainError::EmptyChain)
    }

    /// Return the last accepted block together with its staleness token.
    pub fn head(&self) -> Result<ChainHead> {
        let inner = self.inner.read();
        let block = inner.blocks.last().cloned().ok_or(ChainError::EmptyChain)?;
        Ok(ChainHead {
            block,
            superseded: inner.tail_token.clone(),
        })
    }

    /// Append `candidate`, which was built on top of `predecessor`.
    ///
    /// Fails with `Conflict` if `predecessor` is no longer the tail, or with a
    /// validation error if `candidate` does not extend it. Nothing is mutated
    /// on failure.
    pub fn append(&self, candidate: &Block, predecessor: &Block) -> Result<()> {
        let mut inner = self.inner.write();
        let tail = inner.blocks.last().ok_or(ChainError::EmptyChain)?;

        if tail.hash != predecessor.hash || tail.position != predecessor.position {
            let err = ChainError::conflict(predecessor, tail);
            warn!("CHAIN - rejected #{}: {}", candidate.position, err);
            return Err(err);
        }

        if let Err(err) = validate_block(candidate, tail) {
            warn!("CHAIN - rejected #{}: {}", candidate.position, err);
            return Err(err);
        }

        // Difficulty only moves under this lock, so it matches the tail.
        let required = self.difficulty.current();
        if candidate.difficulty < required {
            let err = ChainError::DifficultyTooLow {
                required,
                actual: candidate.difficulty,
            };
            warn!("CHAIN - rejected #{}: {}", candidate.position, err);
            return Err(err);
        }

        inner.blocks.push(candidate.clone());
        let stale = std::mem::replace(&mut inner.tail_token, CancellationToken::new());
        stale.cancel();
        let state = self.difficulty.on_block_accepted();

        info!(
            "CHAIN - accepted #{} (hash={}, nonce={:x}, difficulty={}, next={})",
            candidate.position, candidate.hash, candidate.nonce, candidate.difficulty, state.difficulty
        );
        Ok(())
    }

    /// Immutable copy of the full chain.
    pub fn snapshot(&self) -> Vec<Block> {
        self.inner.read().blocks.clone()
    }

    /// Re-validate the whole chain from a snapshot.
    pub fn audit(&self) -> Result<()> {
        validate_chain(&self.snapshot())
    }
}
