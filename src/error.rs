use thiserror::Error;

use crate::blockchain::Block;

pub type Result<T> = std::result::Result<T, ChainError>;

/// Every way an append, a mining run or an audit can fail.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The payload could not be turned into canonical JSON. This is a contract
    /// violation upstream, not something a caller can retry.
    #[error("payload could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sequence gap: expected position {expected}, found {actual}")]
    Sequence { expected: i64, actual: i64 },

    #[error("broken linkage at position {position}: expected previous hash {expected:?}, found {actual:?}")]
    Linkage {
        position: i64,
        expected: String,
        actual: String,
    },

    #[error("hash mismatch at position {position}: stored {stored}, recomputed {recomputed}")]
    HashMismatch {
        position: i64,
        stored: String,
        recomputed: String,
    },

    #[error("insufficient work at position {position}: {hash} lacks {difficulty} leading zeros")]
    InsufficientWork {
        position: i64,
        hash: String,
        difficulty: u32,
    },

    #[error("difficulty too low: block mined at {actual}, chain requires {required}")]
    DifficultyTooLow { required: u32, actual: u32 },

    /// The predecessor the candidate was mined against is no longer the tail.
    #[error(
        "chain conflict: candidate built on #{expected_position} ({expected_hash}) but tail is #{actual_position} ({actual_hash})"
    )]
    Conflict {
        expected_position: i64,
        expected_hash: String,
        actual_position: i64,
        actual_hash: String,
    },

    #[error("chain is empty: genesis block was never initialized")]
    EmptyChain,

    #[error("mining exhausted after {attempts} attempts at difficulty {difficulty}")]
    MiningExhausted {
        attempts: u64,
        difficulty: u32,
        next_nonce: Option<u64>,
    },

    #[error("mining cancelled after {attempts} attempts: predecessor #{position} was superseded")]
    MiningCancelled { attempts: u64, position: i64 },
}

impl ChainError {
    /// `predecessor` was the tail a candidate was built on; `tail` is the
    /// block that replaced it.
    pub fn conflict(predecessor: &Block, tail: &Block) -> Self {
        ChainError::Conflict {
            expected_position: predecessor.position,
            expected_hash: predecessor.hash.clone(),
            actual_position: tail.position,
            actual_hash: tail.hash.clone(),
        }
    }

    /// Block failed one of the validator checks.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChainError::Sequence { .. }
                | ChainError::Linkage { .. }
                | ChainError::HashMismatch { .. }
                | ChainError::InsufficientWork { .. }
                | ChainError::DifficultyTooLow { .. }
        )
    }

    /// Lost the race against another append; re-mining on the new tail may succeed.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            ChainError::Conflict { .. } | ChainError::MiningCancelled { .. }
        )
    }

    /// Short machine-readable tag used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ChainError::Serialization(_) => "serialization",
            ChainError::Sequence { .. } => "sequence",
            ChainError::Linkage { .. } => "linkage",
            ChainError::HashMismatch { .. } => "hash_mismatch",
            ChainError::InsufficientWork { .. } => "insufficient_work",
            ChainError::DifficultyTooLow { .. } => "difficulty_too_low",
            ChainError::Conflict { .. } => "conflict",
            ChainError::EmptyChain => "empty_chain",
            ChainError::MiningExhausted { .. } => "mining_exhausted",
            ChainError::MiningCancelled { .. } => "mining_cancelled",
        }
    }
}
