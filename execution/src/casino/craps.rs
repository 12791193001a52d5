//! Craps game engine with a single pass-line style bet.
//!
//! A round starts with a come-out roll:
//! - 7 or 11: the player wins
//! - 2, 3 or 12: the house wins
//! - anything else becomes the point
//!
//! Once a point is set, the player wins by rolling it again and the house wins on a 7.
//! Other totals decide nothing and the shooter keeps rolling.
//!
//! The stake leaves the bank when it is placed. A win returns it doubled, a loss keeps it.

use super::{DiceSource, GameError, GameRng};
use crapshoot_types::casino::{
    Phase, RollOutcome, RoundState, CRAPS, DIE_FACES, NATURALS, NEGATIVE_AMOUNT_MESSAGE,
    SEVEN_OUT, WIN_RETURN_MULTIPLIER,
};
use tracing::{debug, info, warn};

/// Game state and bankroll for one player against the house.
#[derive(Clone, Debug)]
pub struct Craps<D: DiceSource = GameRng> {
    dice: D,
    phase: Phase,
    die_one: u8,
    die_two: u8,
    total: u8,
    score_gained: bool,
    player_wins: u32,
    house_wins: u32,
    bank_balance: u64,
    bet_amount: u64,
}

impl Craps<GameRng> {
    /// Create an engine whose dice are fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    /// Create an engine with dice seeded by the operating system.
    pub fn from_entropy() -> Self {
        Self::new(GameRng::from_entropy())
    }
}

impl<D: DiceSource> Craps<D> {
    pub fn new(dice: D) -> Self {
        Self {
            dice,
            phase: Phase::ComeOut,
            die_one: 0,
            die_two: 0,
            total: 0,
            score_gained: false,
            player_wins: 0,
            house_wins: 0,
            bank_balance: 0,
            bet_amount: 0,
        }
    }

    // ========================================================================
    // Rolling
    // ========================================================================

    /// Roll both dice and record the faces and their total.
    pub fn roll_dice(&mut self) {
        self.die_one = self.dice.roll_die();
        self.die_two = self.dice.roll_die();
        debug_assert!(
            (1..=DIE_FACES).contains(&self.die_one) && (1..=DIE_FACES).contains(&self.die_two),
            "dice source returned a face outside 1..={}: ({}, {})",
            DIE_FACES,
            self.die_one,
            self.die_two
        );
        self.total = self.die_one + self.die_two;
        debug!(
            die_one = self.die_one,
            die_two = self.die_two,
            total = self.total,
            "rolled dice"
        );
    }

    /// Come-out roll: a natural or craps decides the round, anything else sets the point.
    pub fn first_roll(&mut self) -> RollOutcome {
        self.roll_dice();

        if NATURALS.contains(&self.total) {
            self.player_won()
        } else if CRAPS.contains(&self.total) {
            self.house_won()
        } else if let Some(phase) = Phase::establish(self.total) {
            self.phase = phase;
            debug!(point = self.total, "point established");
            RollOutcome::PointEstablished(self.total)
        } else {
            // Unreachable with faces in 1..=6
            RollOutcome::NoDecision
        }
    }

    /// Point phase roll: the point wins, a seven loses, anything else rolls again.
    pub fn additional_rolls(&mut self) -> RollOutcome {
        self.roll_dice();

        if self.total == self.phase.point() {
            self.player_won()
        } else if self.total == SEVEN_OUT {
            self.house_won()
        } else {
            RollOutcome::NoDecision
        }
    }

    /// Roll for whichever phase the round is in.
    pub fn generic_roll(&mut self) -> RollOutcome {
        match self.phase {
            Phase::ComeOut => self.first_roll(),
            Phase::Point(_) => self.additional_rolls(),
        }
    }

    fn player_won(&mut self) -> RollOutcome {
        self.player_wins = self.player_wins.saturating_add(1);
        self.score_gained = true;
        self.win_bet();
        info!(
            total = self.total,
            player_wins = self.player_wins,
            bank_balance = self.bank_balance,
            "player wins round"
        );
        RollOutcome::PlayerWin
    }

    fn house_won(&mut self) -> RollOutcome {
        self.house_wins = self.house_wins.saturating_add(1);
        self.score_gained = true;
        self.lose_bet();
        info!(
            total = self.total,
            house_wins = self.house_wins,
            bank_balance = self.bank_balance,
            "house wins round"
        );
        RollOutcome::HouseWin
    }

    // ========================================================================
    // Betting
    // ========================================================================

    /// Pay the stake back at 1:1 (stake + equal winnings) and clear it.
    pub fn win_bet(&mut self) {
        let winnings = self.bet_amount.saturating_mul(WIN_RETURN_MULTIPLIER);
        self.bank_balance = self.bank_balance.saturating_add(winnings);
        self.bet_amount = 0;
    }

    /// Forfeit the stake. It already left the bank when it was placed.
    pub fn lose_bet(&mut self) {
        self.bet_amount = 0;
    }

    /// Move `amount` from the bank onto the bet.
    ///
    /// Ignored unless `amount` is positive and the stake already on the table does
    /// not exceed the bank. The guard looks at the existing stake, not at `amount`.
    /// An amount larger than the bank is also ignored so the bank never goes negative.
    pub fn update_bet(&mut self, amount: i64) {
        let amount = match u64::try_from(amount) {
            Ok(amount) if amount > 0 => amount,
            _ => {
                debug!(amount, "ignored non-positive bet");
                return;
            }
        };
        if self.bet_amount > self.bank_balance {
            debug!(
                amount,
                bet = self.bet_amount,
                bank_balance = self.bank_balance,
                "ignored bet: stake exceeds bank"
            );
            return;
        }
        let Some(bank_balance) = self.bank_balance.checked_sub(amount) else {
            debug!(
                amount,
                bank_balance = self.bank_balance,
                "ignored bet: amount exceeds bank"
            );
            return;
        };

        self.bet_amount = self.bet_amount.saturating_add(amount);
        self.bank_balance = bank_balance;
        debug!(bet = self.bet_amount, bank_balance, "bet placed");
    }

    /// Set the bank balance. Negative amounts are rejected and leave the balance unchanged.
    pub fn set_bank_balance(&mut self, amount: i64) -> Result<(), GameError> {
        let Ok(amount) = u64::try_from(amount) else {
            warn!(amount, "rejected negative bank balance");
            return Err(GameError::InvalidArgument(NEGATIVE_AMOUNT_MESSAGE));
        };
        self.bank_balance = amount;
        info!(bank_balance = amount, "bank balance set");
        Ok(())
    }

    /// Overwrite the stake without touching the bank.
    pub fn set_bet(&mut self, amount: u64) {
        self.bet_amount = amount;
    }

    /// Overwrite the player's win counter.
    pub fn set_player_wins(&mut self, wins: u32) {
        self.player_wins = wins;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a fresh session: bank, counters and round state all go back to zero.
    pub fn reset_game(&mut self) {
        self.clear_round();
        self.player_wins = 0;
        self.house_wins = 0;
        self.bank_balance = 0;
        info!("game reset");
    }

    /// Start the next round. Bank balance and win counters carry over.
    pub fn start_new_game(&mut self) {
        self.clear_round();
        debug!(bank_balance = self.bank_balance, "new round");
    }

    fn clear_round(&mut self) {
        self.phase = Phase::ComeOut;
        self.die_one = 0;
        self.die_two = 0;
        self.total = 0;
        self.score_gained = false;
        self.bet_amount = 0;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn point(&self) -> u8 {
        self.phase.point()
    }

    pub fn has_rolled(&self) -> bool {
        self.phase.has_rolled()
    }

    pub fn die_one(&self) -> u8 {
        self.die_one
    }

    pub fn die_two(&self) -> u8 {
        self.die_two
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn player_wins(&self) -> u32 {
        self.player_wins
    }

    pub fn house_wins(&self) -> u32 {
        self.house_wins
    }

    pub fn bet(&self) -> u64 {
        self.bet_amount
    }

    pub fn bank_balance(&self) -> u64 {
        self.bank_balance
    }

    /// True once the current round has been decided.
    pub fn point_gained(&self) -> bool {
        self.score_gained
    }

    /// Mutable access to the dice source.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Copy of the current table state.
    pub fn snapshot(&self) -> RoundState {
        RoundState {
            die_one: self.die_one,
            die_two: self.die_two,
            total: self.total,
            point: self.phase.point(),
            has_rolled: self.phase.has_rolled(),
            score_gained: self.score_gained,
            player_wins: self.player_wins,
            house_wins: self.house_wins,
            bank_balance: self.bank_balance,
            bet_amount: self.bet_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_engine, ScriptedDice};
    use crapshoot_types::casino::POINT_NUMBERS;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "dice source returned a face outside 1..=6: (7, 1)")]
    fn test_roll_dice_rejects_out_of_range_face() {
        let mut engine = create_engine(0, &[(7, 1)]);
        engine.roll_dice();
    }

    #[test]
    fn test_initial_state() {
        let engine = Craps::new(ScriptedDice::default());

        assert_eq!(engine.point(), 0);
        assert_eq!(engine.die_one(), 0);
        assert_eq!(engine.die_two(), 0);
        assert_eq!(engine.total(), 0);
        assert_eq!(engine.player_wins(), 0);
        assert_eq!(engine.house_wins(), 0);
        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 0);
        assert!(!engine.point_gained());
        assert!(!engine.has_rolled());
        assert_eq!(engine.phase(), Phase::ComeOut);
        assert_eq!(engine.snapshot(), RoundState::default());
    }

    #[test]
    fn test_roll_dice_in_range() {
        let mut engine = Craps::seeded(42);

        for _ in 0..500 {
            engine.roll_dice();
            assert!((1..=6).contains(&engine.die_one()));
            assert!((1..=6).contains(&engine.die_two()));
            assert_eq!(engine.total(), engine.die_one() + engine.die_two());
            assert!((2..=12).contains(&engine.total()));
        }
    }

    #[test]
    fn test_roll_dice_does_not_touch_round() {
        let mut engine = create_engine(100, &[(6, 1)]);
        engine.roll_dice();

        assert_eq!(engine.total(), 7);
        assert_eq!(engine.player_wins(), 0);
        assert!(!engine.point_gained());
        assert_eq!(engine.phase(), Phase::ComeOut);
    }

    #[test]
    fn test_first_roll_naturals() {
        for (d1, d2) in [(3, 4), (5, 6)] {
            let mut engine = create_engine(0, &[(d1, d2)]);
            let outcome = engine.first_roll();

            assert_eq!(outcome, RollOutcome::PlayerWin);
            assert_eq!(engine.player_wins(), 1);
            assert_eq!(engine.house_wins(), 0);
            assert!(engine.point_gained());
            assert!(!engine.has_rolled());
            assert_eq!(engine.point(), 0);
        }
    }

    #[test]
    fn test_first_roll_craps() {
        for (d1, d2) in [(1, 1), (1, 2), (6, 6)] {
            let mut engine = create_engine(0, &[(d1, d2)]);
            let outcome = engine.first_roll();

            assert_eq!(outcome, RollOutcome::HouseWin);
            assert_eq!(engine.house_wins(), 1);
            assert_eq!(engine.player_wins(), 0);
            assert!(engine.point_gained());
            assert!(!engine.has_rolled());
        }
    }

    #[test]
    fn test_first_roll_establishes_point() {
        for point in POINT_NUMBERS {
            let d1 = if point > 6 { 6 } else { 1 };
            let d2 = point - d1;
            let mut engine = create_engine(0, &[(d1, d2)]);
            let outcome = engine.first_roll();

            assert_eq!(outcome, RollOutcome::PointEstablished(point));
            assert_eq!(engine.point(), point);
            assert!(engine.has_rolled());
            assert_eq!(engine.phase(), Phase::Point(point));
            assert!(!engine.point_gained());
            assert_eq!(engine.player_wins(), 0);
            assert_eq!(engine.house_wins(), 0);
        }
    }

    #[test]
    fn test_first_roll_total_matches_dice() {
        let mut engine = Craps::seeded(9);
        engine.first_roll();
        assert_eq!(engine.total(), engine.die_one() + engine.die_two());
    }

    #[test]
    fn test_additional_rolls_make_point() {
        let mut engine = create_engine(0, &[(2, 3), (4, 1)]);
        engine.first_roll();

        let outcome = engine.additional_rolls();
        assert_eq!(outcome, RollOutcome::PlayerWin);
        assert_eq!(engine.player_wins(), 1);
        assert!(engine.point_gained());
    }

    #[test]
    fn test_additional_rolls_seven_out() {
        let mut engine = create_engine(0, &[(4, 4), (5, 2)]);
        engine.first_roll();

        let outcome = engine.additional_rolls();
        assert_eq!(outcome, RollOutcome::HouseWin);
        assert_eq!(engine.house_wins(), 1);
        assert!(engine.point_gained());
    }

    #[test]
    fn test_additional_rolls_no_decision() {
        let mut engine = create_engine(100, &[(3, 3), (5, 6), (1, 1)]);
        engine.update_bet(40);
        engine.first_roll();
        let before = engine.snapshot();

        // 11 and 2 mean nothing once the point is 6
        for expected_total in [11, 2] {
            let outcome = engine.additional_rolls();
            assert_eq!(outcome, RollOutcome::NoDecision);
            assert_eq!(engine.total(), expected_total);

            let after = engine.snapshot();
            assert_eq!(
                RoundState {
                    die_one: after.die_one,
                    die_two: after.die_two,
                    total: after.total,
                    ..before
                },
                after
            );
        }
    }

    #[test]
    fn test_generic_roll_dispatches_on_phase() {
        // 8 sets the point, 3 is nothing, 8 wins
        let mut engine = create_engine(0, &[(5, 3), (1, 2), (6, 2)]);

        assert_eq!(engine.generic_roll(), RollOutcome::PointEstablished(8));
        // A come-out 3 would be craps; in the point phase it is not
        assert_eq!(engine.generic_roll(), RollOutcome::NoDecision);
        assert_eq!(engine.house_wins(), 0);
        assert_eq!(engine.generic_roll(), RollOutcome::PlayerWin);
        assert_eq!(engine.player_wins(), 1);
    }

    #[test]
    fn test_update_bet() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(50);

        assert_eq!(engine.bet(), 50);
        assert_eq!(engine.bank_balance(), 50);
    }

    #[test]
    fn test_win_bet() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(50);
        engine.win_bet();

        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 150);
    }

    #[test]
    fn test_lose_bet() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(50);
        engine.lose_bet();

        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 50);
    }

    #[test]
    fn test_update_bet_ignores_non_positive() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(0);
        engine.update_bet(-25);

        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 100);
    }

    #[test]
    fn test_update_bet_accumulates() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(30);
        engine.update_bet(20);

        assert_eq!(engine.bet(), 50);
        assert_eq!(engine.bank_balance(), 50);
    }

    #[test]
    fn test_update_bet_guard_uses_existing_stake() {
        // The guard compares the stake already on the table with the bank,
        // not the amount being added.
        let mut engine = create_engine(100, &[]);
        engine.update_bet(60);
        assert_eq!(engine.bet(), 60);
        assert_eq!(engine.bank_balance(), 40);

        // 30 is affordable, but the existing 60 stake exceeds the 40 left in the bank
        engine.update_bet(30);
        assert_eq!(engine.bet(), 60);
        assert_eq!(engine.bank_balance(), 40);
    }

    #[test]
    fn test_update_bet_guard_allows_stake_above_remaining_bank() {
        // 40 <= 60 passes the guard even though the total stake ends up at 90
        let mut engine = create_engine(100, &[]);
        engine.update_bet(40);
        engine.update_bet(50);

        assert_eq!(engine.bet(), 90);
        assert_eq!(engine.bank_balance(), 10);
    }

    #[test]
    fn test_update_bet_never_overdraws_bank() {
        let mut engine = create_engine(100, &[]);
        engine.update_bet(500);

        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 100);
    }

    #[test]
    fn test_set_bank_balance_rejects_negative() {
        let mut engine = create_engine(80, &[]);
        let result = engine.set_bank_balance(-1);

        assert_eq!(
            result,
            Err(GameError::InvalidArgument(NEGATIVE_AMOUNT_MESSAGE))
        );
        assert_eq!(engine.bank_balance(), 80);
    }

    #[test]
    fn test_set_bank_balance_accepts_zero() {
        let mut engine = create_engine(80, &[]);
        assert!(engine.set_bank_balance(0).is_ok());
        assert_eq!(engine.bank_balance(), 0);
    }

    #[test]
    fn test_unchecked_setters() {
        let mut engine = create_engine(10, &[]);
        engine.set_player_wins(engine.player_wins() + 1);
        engine.set_bet(500);

        assert_eq!(engine.player_wins(), 1);
        assert_eq!(engine.bet(), 500);
        // The bank is not touched by set_bet
        assert_eq!(engine.bank_balance(), 10);
    }

    #[test]
    fn test_win_on_come_out_pays_bet() {
        let mut engine = create_engine(100, &[(5, 6)]);
        engine.update_bet(25);
        engine.generic_roll();

        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 125);
    }

    #[test]
    fn test_seven_out_forfeits_bet() {
        let mut engine = create_engine(100, &[(2, 2), (3, 4)]);
        engine.update_bet(25);
        engine.generic_roll();
        assert_eq!(engine.bet(), 25);

        engine.generic_roll();
        assert_eq!(engine.bet(), 0);
        assert_eq!(engine.bank_balance(), 75);
    }

    #[test]
    fn test_reset_game() {
        let mut engine = create_engine(100, &[(3, 3), (3, 3)]);
        engine.update_bet(10);
        engine.generic_roll();
        engine.generic_roll();
        assert_eq!(engine.player_wins(), 1);

        engine.reset_game();
        assert_eq!(engine.snapshot(), RoundState::default());
        assert_eq!(engine.phase(), Phase::ComeOut);
    }

    #[test]
    fn test_start_new_game_keeps_bank_and_counters() {
        let mut engine = create_engine(100, &[(6, 6), (4, 5), (2, 2)]);
        engine.update_bet(10);
        engine.generic_roll();
        assert_eq!(engine.house_wins(), 1);

        engine.start_new_game();
        engine.update_bet(20);
        engine.generic_roll();
        assert_eq!(engine.point(), 9);

        engine.start_new_game();
        let state = engine.snapshot();
        assert_eq!(state.bank_balance, 70);
        assert_eq!(state.house_wins, 1);
        assert_eq!(state.player_wins, 0);
        assert_eq!(state.bet_amount, 0);
        assert_eq!(state.point, 0);
        assert_eq!(state.total, 0);
        assert_eq!((state.die_one, state.die_two), (0, 0));
        assert!(!state.has_rolled);
        assert!(!state.score_gained);

        // Next roll is a come-out again: 2+2 sets a new point
        assert_eq!(engine.generic_roll(), RollOutcome::PointEstablished(4));
    }

    #[test]
    fn test_snapshot_matches_getters() {
        let mut engine = create_engine(60, &[(4, 6)]);
        engine.update_bet(15);
        engine.generic_roll();

        let state = engine.snapshot();
        assert_eq!(state.die_one, 4);
        assert_eq!(state.die_two, 6);
        assert_eq!(state.total, 10);
        assert_eq!(state.point, 10);
        assert!(state.has_rolled);
        assert_eq!(state.bet_amount, 15);
        assert_eq!(state.bank_balance, 45);
        assert_eq!(state.phase(), Some(engine.phase()));
    }
}
