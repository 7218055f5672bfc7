use super::{Block, GENESIS_POSITION};
use crate::error::{ChainError, Result};

/// Check `candidate` against the block it claims to extend.
///
/// Cheap structural checks run before the hash is recomputed.
pub fn validate_block(candidate: &Block, predecessor: &Block) -> Result<()> {
    let expected_position = predecessor.position + 1;
    if candidate.position != expected_position {
        return Err(ChainError::Sequence {
            expected: expected_position,
            actual: candidate.position,
        });
    }

    if candidate.previous_hash != predecessor.hash {
        return Err(ChainError::Linkage {
            position: candidate.position,
            expected: predecessor.hash.clone(),
            actual: candidate.previous_hash.clone(),
        });
    }

    validate_integrity(candidate)
}

/// Hash self-consistency plus the Proof-of-Work condition.
fn validate_integrity(block: &Block) -> Result<()> {
    let recomputed = block.compute_hash()?;
    if recomputed != block.hash {
        return Err(ChainError::HashMismatch {
            position: block.position,
            stored: block.hash.clone(),
            recomputed,
        });
    }

    if !block.has_valid_work() {
        return Err(ChainError::InsufficientWork {
            position: block.position,
            hash: block.hash.clone(),
            difficulty: block.difficulty,
        });
    }

    Ok(())
}

/// Validate a whole chain: genesis shape and integrity, then every block
/// pairwise against its predecessor.
pub fn validate_chain(chain: &[Block]) -> Result<()> {
    let genesis = chain.first().ok_or(ChainError::EmptyChain)?;

    if genesis.position != GENESIS_POSITION {
        return Err(ChainError::Sequence {
            expected: GENESIS_POSITION,
            actual: genesis.position,
        });
    }
    if !genesis.previous_hash.is_empty() {
        return Err(ChainError::Linkage {
            position: genesis.position,
            expected: String::new(),
            actual: genesis.previous_hash.clone(),
        });
    }
    validate_integrity(genesis)?;

    for pair in chain.windows(2) {
        validate_block(&pair[1], &pair[0])?;
    }

    Ok(())
}
