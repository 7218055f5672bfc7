pub mod block;
pub mod difficulty;
pub mod hash;
pub mod ledger;
pub mod pow;
pub mod store;
pub mod validation;

pub use block::Block;
pub use difficulty::{DifficultyController, DifficultyState};
pub use ledger::Ledger;
pub use pow::Miner;
pub use store::{ChainHead, ChainStore};

/// Position carried by the genesis block; the first record sits at 0.
pub const GENESIS_POSITION: i64 = -1;

/// Starting Proof-of-Work difficulty (leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 1;

/// Accepted blocks between difficulty increases.
pub const DIFFICULTY_STEP_INTERVAL: u32 = 10;

/// Extra mining rounds a submission gets after losing the append race.
pub const DEFAULT_APPEND_RETRIES: u32 = 3;
