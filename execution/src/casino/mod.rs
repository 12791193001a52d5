//! Casino game execution module.
//!
//! This module contains the dice source and the craps engine built on it.

pub mod craps;

use crapshoot_types::casino::DIE_FACES;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Source of die faces for a game.
///
/// Engines never construct their own randomness; a source is handed in so
/// rounds can be replayed from a seed or a fixed script.
pub trait DiceSource {
    /// Roll a single die (1-6).
    fn roll_die(&mut self) -> u8;
}

/// Deterministic random number generator for dice.
///
/// Same seed, same sequence of faces.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a new RNG seeded by the operating system.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.inner.gen()
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.next_bounded(DIE_FACES) + 1
    }
}

/// Error during game execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Caller supplied a value outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
