//! Deterministic dice and engine helpers for tests.

use crate::casino::{craps::Craps, DiceSource};
use std::collections::VecDeque;

/// Replays a fixed sequence of die faces.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Script a sequence of (die one, die two) rolls.
    pub fn rolls(rolls: &[(u8, u8)]) -> Self {
        Self::new(rolls.iter().flat_map(|&(d1, d2)| [d1, d2]))
    }

    /// Queue one more roll.
    pub fn push_roll(&mut self, d1: u8, d2: u8) {
        self.faces.push_back(d1);
        self.faces.push_back(d2);
    }

    /// Faces not yet rolled.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        self.faces
            .pop_front()
            .expect("scripted dice ran out of faces")
    }
}

/// Creates an engine with `bank` in the bank and the given rolls queued
pub fn create_engine(bank: u64, rolls: &[(u8, u8)]) -> Craps<ScriptedDice> {
    let mut engine = Craps::new(ScriptedDice::rolls(rolls));
    let bank = i64::try_from(bank).expect("bank fits in i64");
    engine
        .set_bank_balance(bank)
        .expect("non-negative bank balance");
    engine
}
