use serde::{Deserialize, Serialize};
use std::fmt;

use super::POINT_NUMBERS;

/// Craps phases.
///
/// A round starts in `ComeOut`. A come-out total of 4, 5, 6, 8, 9 or 10 moves it
/// to `Point` carrying that total; every later roll resolves against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    ComeOut,
    Point(u8),
}

impl Phase {
    /// Phase entered when `total` is rolled on the come-out, if it is a point number.
    pub fn establish(total: u8) -> Option<Self> {
        POINT_NUMBERS.contains(&total).then_some(Phase::Point(total))
    }

    /// Established point, or 0 before one exists.
    pub fn point(&self) -> u8 {
        match self {
            Phase::ComeOut => 0,
            Phase::Point(point) => *point,
        }
    }

    /// True once the come-out roll has set a point.
    pub fn has_rolled(&self) -> bool {
        matches!(self, Phase::Point(_))
    }
}

impl TryFrom<u8> for Phase {
    type Error = ();

    /// Decode a raw point value (0 = no point).
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::ComeOut),
            point => Phase::establish(point).ok_or(()),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::ComeOut => write!(f, "come-out"),
            Phase::Point(point) => write!(f, "point {}", point),
        }
    }
}

/// What a single roll did to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollOutcome {
    /// Natural on the come-out, or the point was made.
    PlayerWin,
    /// Craps on the come-out, or a seven before the point.
    HouseWin,
    /// Come-out total became the point.
    PointEstablished(u8),
    /// Point phase roll that decided nothing.
    NoDecision,
}

impl RollOutcome {
    pub fn is_decided(&self) -> bool {
        matches!(self, RollOutcome::PlayerWin | RollOutcome::HouseWin)
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollOutcome::PlayerWin => write!(f, "Player wins!"),
            RollOutcome::HouseWin => write!(f, "House wins!"),
            RollOutcome::PointEstablished(point) => write!(f, "Point is {}", point),
            RollOutcome::NoDecision => write!(f, "Roll again"),
        }
    }
}

/// Snapshot of everything a front-end needs to render the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub die_one: u8,
    pub die_two: u8,
    pub total: u8,
    pub point: u8,
    pub has_rolled: bool,
    pub score_gained: bool,
    pub player_wins: u32,
    pub house_wins: u32,
    pub bank_balance: u64,
    pub bet_amount: u64,
}

impl RoundState {
    /// Phase encoded by `point`, or `None` if the snapshot carries an invalid point.
    pub fn phase(&self) -> Option<Phase> {
        Phase::try_from(self.point).ok()
    }
}
