pub mod casino;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use casino::craps::Craps;
pub use casino::{DiceSource, GameError, GameRng};
