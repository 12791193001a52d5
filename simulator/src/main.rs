use anyhow::Context;
use clap::Parser;
use crapshoot_execution::Craps;
use crapshoot_simulator::{autoplay, Table};
use std::io;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the dice (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting bank balance
    #[arg(short, long, default_value_t = 0)]
    bank: u64,

    /// Print the table as JSON
    #[arg(long)]
    json: bool,

    /// Play this many rounds unattended and print a summary
    #[arg(long)]
    autoplay: Option<u32>,

    /// Stake per round when playing unattended
    #[arg(long, default_value_t = 10)]
    stake: u64,

    /// Log at DEBUG instead of INFO
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // Create engine
    let mut engine = match args.seed {
        Some(seed) => Craps::seeded(seed),
        None => Craps::from_entropy(),
    };
    let bank = i64::try_from(args.bank).context("bank balance too large")?;
    engine
        .set_bank_balance(bank)
        .context("invalid starting bank balance")?;
    info!(seed = ?args.seed, bank = args.bank, "table opened");

    if let Some(rounds) = args.autoplay {
        let summary = autoplay(&mut engine, rounds, args.stake);
        if args.json {
            println!(
                "{}",
                serde_json::to_string(&summary).context("failed to encode summary")?
            );
        } else {
            println!("{}", summary);
        }
        return Ok(());
    }

    let mut table = Table::new(engine, args.json);
    table.run(io::stdin().lock(), io::stdout().lock())
}
