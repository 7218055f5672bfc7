use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use super::Block;
use crate::error::Result;

/// Canonical string form of a block timestamp inside the preimage.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// SHA-256 (hex) over `position:previous_hash:timestamp:payload_json:nonce_hex:difficulty`.
pub fn digest(block: &Block) -> Result<String> {
    Ok(Preimage::of(block)?.digest(block.nonce))
}

/// True when `hash` starts with at least `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let needed = difficulty as usize;
    hash.len() >= needed && hash.bytes().take(needed).all(|b| b == b'0')
}

/// The nonce-independent parts of a block's preimage, hashed once.
///
/// Mining recomputes the digest for every nonce; only the nonce changes, so
/// the hasher state after the prefix is cloned instead of re-serializing the
/// payload on each attempt.
#[derive(Clone)]
pub struct Preimage {
    prefix: Sha256,
    suffix: String,
}

impl Preimage {
    pub fn of(block: &Block) -> Result<Self> {
        let payload_json = serde_json::to_string(&block.payload)?;
        let head = format!(
            "{}:{}:{}:{}:",
            block.position,
            block.previous_hash,
            canonical_timestamp(&block.timestamp),
            payload_json
        );
        let mut prefix = Sha256::new();
        prefix.update(head.as_bytes());
        Ok(Self {
            prefix,
            suffix: format!(":{}", block.difficulty),
        })
    }

    pub fn digest(&self, nonce: u64) -> String {
        let mut hasher = self.prefix.clone();
        hasher.update(format!("{nonce:x}").as_bytes());
        hasher.update(self.suffix.as_bytes());
        hex::encode(hasher.finalize())
    }
}
