use std::sync::Arc;

use log::{debug, warn};

use super::{Block, ChainHead, ChainStore, DifficultyController, DifficultyState, Miner};
use crate::checkout::BookCheckout;
use crate::error::{ChainError, Result};

/// Entry point for collaborators: submit checkout records, read the chain.
///
/// Owns the chain store and shares the difficulty controller with it. Built
/// once at startup and handed to the HTTP layer behind an `Arc`.
#[derive(Debug)]
pub struct Ledger {
    store: ChainStore,
    difficulty: Arc<DifficultyController>,
    miner: Miner,
    append_retries: u32,
}

impl Ledger {
    pub fn new(difficulty: Arc<DifficultyController>, miner: Miner, append_retries: u32) -> Result<Self> {
        let store = ChainStore::with_genesis(difficulty.clone())?;
        Ok(Self {
            store,
            difficulty,
            miner,
            append_retries,
        })
    }

    /// Mine `payload` on the current tail and append it. One attempt only: a
    /// lost race surfaces as `Conflict`.
    pub fn submit_record(&self, payload: BookCheckout) -> Result<Block> {
        // Head before difficulty: a raised target always comes with a new tail,
        // so a stale difficulty read implies a stale head and a conflict.
        let head = self.store.head()?;
        self.submit_on(head, payload)
    }

    fn submit_on(&self, head: ChainHead, payload: BookCheckout) -> Result<Block> {
        let difficulty = self.difficulty.current();
        debug!(
            "LEDGER - mining on #{} at difficulty {}",
            head.block.position, difficulty
        );

        let block = match self
            .miner
            .mine(&head.block, payload, difficulty, &head.superseded)
        {
            Ok(block) => block,
            // Another append replaced the head mid-search; report it the same
            // way `append` reports a stale predecessor.
            Err(ChainError::MiningCancelled { attempts, .. }) => {
                let tail = self.store.tail()?;
                let err = ChainError::conflict(&head.block, &tail);
                warn!("LEDGER - abandoned search after {attempts} attempts: {err}");
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        self.store.append(&block, &head.block)?;
        Ok(block)
    }

    /// `submit_record`, re-mining against the refreshed tail after a lost race,
    /// up to `append_retries` extra times.
    pub fn submit_with_retry(&self, payload: BookCheckout) -> Result<Block> {
        let mut retries = 0;
        loop {
            match self.submit_record(payload.clone()) {
                Err(err) if err.is_stale() && retries < self.append_retries => {
                    retries += 1;
                    warn!(
                        "LEDGER - retry {}/{} for book {}: {}",
                        retries, self.append_retries, payload.id, err
                    );
                }
                result => return result,
            }
        }
    }

    pub fn read_chain(&self) -> Vec<Block> {
        self.store.snapshot()
    }

    pub fn difficulty(&self) -> DifficultyState {
        self.difficulty.snapshot()
    }

    pub fn step_interval(&self) -> u32 {
        self.difficulty.step_interval()
    }

    pub fn audit(&self) -> Result<()> {
        self.store.audit()
    }
}
