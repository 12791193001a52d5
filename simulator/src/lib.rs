//! Terminal craps table.
//!
//! `Table` owns a single engine and re-renders from its getters after every
//! command. It performs the same input checks the desktop screen did: amounts
//! must be numeric, a bet may not exceed the bank, and rolling waits for
//! `start` and for a new round once the current one is decided.

use anyhow::Context;
use crapshoot_execution::{Craps, DiceSource, GameError, GameRng};
use crapshoot_types::casino::{RollOutcome, RoundState};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const WELCOME: &str = "The Game of Craps. Type `help` for commands, `start` to begin.";

pub const RULES: &str = "\
The rules of the game:

A player rolls two dice where each die has six faces (values 1 through 6).
After the dice have come to rest the sum of the two upward faces is calculated.
The first roll:
  If the sum is 7 or 11 the player wins.
  If the sum is 2, 3 or 12 the player loses, that is the house wins.
  If the sum is 4, 5, 6, 8, 9 or 10, that sum becomes the player's point.
Continue rolling given the player's point:
  The player must roll the point total before rolling a 7 in order to win.
  If they roll a 7 before the point the player loses (the house wins).";

pub const ABOUT: &str = "crapshoot: a two-party craps table. One bet per round, paid at 1:1.";

pub const HELP: &str = "\
Commands:
  start         enable rolling and betting
  bank <n>      set the bank balance
  bet <n>       move n from the bank onto the bet
  roll          roll the dice
  again         start a new round (bank and win totals carry over)
  reset         clear everything, including bank and win totals
  status        show the table
  rules         show the rules
  about         about this game
  quit          leave the table";

/// Errors reported back to the player. None of them end the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Input valid bank amount.")]
    InvalidBankAmount,
    #[error("Input valid bet amount.")]
    InvalidBetAmount,
    #[error("Bet amount is more than Bank amount.")]
    BetExceedsBank,
    #[error("Bet not placed: the stake of {stake} already exceeds the bank of {bank}.")]
    BetNotPlaced { stake: u64, bank: u64 },
    #[error("Select start to begin.")]
    NotStarted,
    #[error("Round is over. Play again to start a new round.")]
    RoundOver,
    #[error("unknown command `{0}`; type `help` for a list")]
    UnknownCommand(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// A single line of player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Bank(i64),
    Bet(i64),
    Roll,
    Again,
    Reset,
    Status,
    Rules,
    About,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = TableError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let word = parts.next().unwrap_or_default().to_ascii_lowercase();
        let amount = match (parts.next(), parts.next()) {
            (Some(arg), None) => arg.parse::<i64>().ok(),
            _ => None,
        };

        match word.as_str() {
            "start" => Ok(Command::Start),
            "bank" => amount.map(Command::Bank).ok_or(TableError::InvalidBankAmount),
            "bet" => amount.map(Command::Bet).ok_or(TableError::InvalidBetAmount),
            "roll" => Ok(Command::Roll),
            "again" | "play" => Ok(Command::Again),
            "reset" => Ok(Command::Reset),
            "status" => Ok(Command::Status),
            "rules" => Ok(Command::Rules),
            "about" => Ok(Command::About),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(TableError::UnknownCommand(word)),
        }
    }
}

/// What the table should show after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    State,
    Rolled(RollOutcome),
    /// New round started with a stake still on the table.
    Forfeited(u64),
    Text(&'static str),
    Quit,
}

pub struct Table<D: DiceSource = GameRng> {
    engine: Craps<D>,
    started: bool,
    json: bool,
}

impl<D: DiceSource> Table<D> {
    pub fn new(engine: Craps<D>, json: bool) -> Self {
        Self {
            engine,
            started: false,
            json,
        }
    }

    pub fn engine(&self) -> &Craps<D> {
        &self.engine
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Apply one command to the engine.
    pub fn apply(&mut self, command: Command) -> Result<Reply, TableError> {
        debug!(?command, "applying command");
        match command {
            Command::Start => {
                self.started = true;
                Ok(Reply::Text("Place your bet and roll the dice."))
            }
            Command::Bank(amount) => {
                self.engine.set_bank_balance(amount)?;
                Ok(Reply::State)
            }
            Command::Bet(amount) => {
                self.ensure_started()?;
                let Some(requested) = u64::try_from(amount).ok().filter(|amount| *amount > 0)
                else {
                    return Err(TableError::InvalidBetAmount);
                };
                if requested > self.engine.bank_balance() {
                    return Err(TableError::BetExceedsBank);
                }

                let stake = self.engine.bet();
                self.engine.update_bet(amount);
                if self.engine.bet() == stake {
                    return Err(TableError::BetNotPlaced {
                        stake,
                        bank: self.engine.bank_balance(),
                    });
                }
                Ok(Reply::State)
            }
            Command::Roll => {
                self.ensure_started()?;
                if self.engine.point_gained() {
                    return Err(TableError::RoundOver);
                }
                Ok(Reply::Rolled(self.engine.generic_roll()))
            }
            Command::Again => {
                self.ensure_started()?;
                let stake = self.engine.bet();
                self.engine.start_new_game();
                if stake > 0 {
                    warn!(stake, "stake forfeited by new round");
                    return Ok(Reply::Forfeited(stake));
                }
                Ok(Reply::State)
            }
            Command::Reset => {
                self.engine.reset_game();
                self.started = false;
                Ok(Reply::State)
            }
            Command::Status => Ok(Reply::State),
            Command::Rules => Ok(Reply::Text(RULES)),
            Command::About => Ok(Reply::Text(ABOUT)),
            Command::Help => Ok(Reply::Text(HELP)),
            Command::Quit => Ok(Reply::Quit),
        }
    }

    fn ensure_started(&self) -> Result<(), TableError> {
        if self.started {
            Ok(())
        } else {
            Err(TableError::NotStarted)
        }
    }

    /// Text to print for a reply.
    pub fn render(&self, reply: &Reply) -> Result<String, serde_json::Error> {
        let text = match reply {
            Reply::State => self.render_state()?,
            Reply::Rolled(outcome) => format!("{}\n{}", outcome, self.render_state()?),
            Reply::Forfeited(stake) => {
                format!("Stake of {} forfeited.\n{}", stake, self.render_state()?)
            }
            Reply::Text(text) => text.to_string(),
            Reply::Quit => String::new(),
        };
        Ok(text)
    }

    fn render_state(&self) -> Result<String, serde_json::Error> {
        let state = self.engine.snapshot();
        if self.json {
            return serde_json::to_string(&state);
        }
        Ok(render_round(&state))
    }

    /// Read commands until input ends or the player quits.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        writeln!(output, "{}", WELCOME).context("failed to write output")?;
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let written = match line.parse::<Command>().and_then(|command| self.apply(command)) {
                Ok(Reply::Quit) => break,
                Ok(reply) => {
                    let text = self.render(&reply).context("failed to render table")?;
                    writeln!(output, "{}", text)
                }
                Err(err) => writeln!(output, "Uh oh! {}", err),
            };
            written.context("failed to write output")?;
        }

        let state = self.engine.snapshot();
        info!(
            player_wins = state.player_wins,
            house_wins = state.house_wins,
            bank_balance = state.bank_balance,
            "session ended"
        );
        Ok(())
    }
}

fn render_round(state: &RoundState) -> String {
    format!(
        "Die One: {}  Die Two: {}  Total: {}\n\
         Point: {}\n\
         Bet Total: {}  Bank: ${}\n\
         Player Win Total: {}  House Win Total: {}",
        state.die_one,
        state.die_two,
        state.total,
        state.point,
        state.bet_amount,
        state.bank_balance,
        state.player_wins,
        state.house_wins,
    )
}

/// Result of an unattended session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rounds: u32,
    pub rolls: u64,
    pub player_wins: u32,
    pub house_wins: u32,
    pub bank_balance: u64,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rounds: {}  Rolls: {}\nPlayer Win Total: {}  House Win Total: {}\nBank: ${}",
            self.rounds, self.rolls, self.player_wins, self.house_wins, self.bank_balance
        )
    }
}

/// Play `rounds` rounds, staking `stake` each round while the bank covers it.
pub fn autoplay<D: DiceSource>(engine: &mut Craps<D>, rounds: u32, stake: u64) -> Summary {
    let mut rolls = 0u64;
    for round in 0..rounds {
        engine.start_new_game();
        if stake > 0 && stake <= engine.bank_balance() {
            if let Ok(stake) = i64::try_from(stake) {
                engine.update_bet(stake);
            }
        }

        let outcome = loop {
            let outcome = engine.generic_roll();
            rolls += 1;
            if outcome.is_decided() {
                break outcome;
            }
        };
        debug!(round, %outcome, bank_balance = engine.bank_balance(), "round decided");
    }
    engine.start_new_game();

    Summary {
        rounds,
        rolls,
        player_wins: engine.player_wins(),
        house_wins: engine.house_wins(),
        bank_balance: engine.bank_balance(),
    }
}
