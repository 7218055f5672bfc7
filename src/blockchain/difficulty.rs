use log::info;
use parking_lot::RwLock;
use serde::Serialize;

/// Snapshot of the difficulty ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyState {
    pub difficulty: u32,
    pub accepted_since_increase: u32,
}

/// Linear difficulty ramp: +1 after every `step_interval` accepted blocks.
///
/// Guarded by its own lock so miners reading the target never wait behind a
/// chain write. Only the chain store calls `on_block_accepted`, while it
/// holds the chain write lock.
#[derive(Debug)]
pub struct DifficultyController {
    state: RwLock<DifficultyState>,
    step_interval: u32,
}

impl DifficultyController {
    /// `step_interval` is clamped to at least 1.
    pub fn new(initial: u32, step_interval: u32) -> Self {
        Self {
            state: RwLock::new(DifficultyState {
                difficulty: initial,
                accepted_since_increase: 0,
            }),
            step_interval: step_interval.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.state.read().difficulty
    }

    pub fn snapshot(&self) -> DifficultyState {
        *self.state.read()
    }

    pub fn step_interval(&self) -> u32 {
        self.step_interval
    }

    /// Count one accepted block; raise the difficulty when the interval fills.
    pub fn on_block_accepted(&self) -> DifficultyState {
        let mut state = self.state.write();
        state.accepted_since_increase += 1;
        if state.accepted_since_increase >= self.step_interval {
            state.accepted_since_increase = 0;
            state.difficulty = state.difficulty.saturating_add(1);
            info!(
                "DIFFICULTY - raised to {} after {} blocks",
                state.difficulty, self.step_interval
            );
        }
        *state
    }
}

#[cfg(test)]
mod tests {
    use super::DifficultyController;
    use crate::blockchain::{DEFAULT_DIFFICULTY, DIFFICULTY_STEP_INTERVAL};

    #[test]
    fn raises_by_one_every_interval() {
        let ctl = DifficultyController::new(DEFAULT_DIFFICULTY, DIFFICULTY_STEP_INTERVAL);
        let mut previous = ctl.current();
        for accepted in 1..=35u32 {
            let state = ctl.on_block_accepted();
            let expected = DEFAULT_DIFFICULTY + accepted / DIFFICULTY_STEP_INTERVAL;
            assert_eq!(state.difficulty, expected);
            assert_eq!(state.accepted_since_increase, accepted % DIFFICULTY_STEP_INTERVAL);
            assert!(state.difficulty >= previous);
            previous = state.difficulty;
        }
        assert_eq!(ctl.current(), DEFAULT_DIFFICULTY + 3);
    }

    #[test]
    fn ninth_block_does_not_raise() {
        let ctl = DifficultyController::new(1, 10);
        for _ in 0..9 {
            ctl.on_block_accepted();
        }
        assert_eq!(ctl.current(), 1);
        ctl.on_block_accepted();
        assert_eq!(ctl.current(), 2);
        assert_eq!(ctl.snapshot().accepted_since_increase, 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let ctl = DifficultyController::new(1, 0);
        assert_eq!(ctl.step_interval(), 1);
        ctl.on_block_accepted();
        assert_eq!(ctl.current(), 2);
    }
}
