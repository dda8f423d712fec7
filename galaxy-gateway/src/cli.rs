//! The `galaxy` CLI (§6 "CLI"): `init`, `process-turn [--force]`, `status`.
//! A thin operator-facing wrapper around [`galaxy_turn`] — no logic lives
//! here beyond argument parsing and printing.

use clap::{Parser, Subcommand};

use galaxy_common::clock::{Clock, SystemClock};
use galaxy_store::Store;

#[derive(Parser, Debug)]
#[command(name = "galaxy", about = "Galaxy turn engine operator CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// One-time singleton initialization.
    Init,
    /// Runs the end-of-turn pipeline immediately instead of waiting out the
    /// turn clock. `--force` clears a stuck `is_processing` flag first.
    ProcessTurn {
        #[arg(long)]
        force: bool,
    },
    /// Prints the current turn number, phase, and time remaining.
    Status,
}

pub async fn run(cli: Cli, store: &dyn Store, turn_duration: chrono::Duration, keep_last_n_turns: u64) -> anyhow::Result<()> {
    let clock = SystemClock;

    match cli.command {
        Command::Init => {
            galaxy_turn::initialize(store, &clock).await?;
            println!("initialized turn 1 at {}", clock.now());
        }
        Command::ProcessTurn { force } => {
            if force {
                let mut tx = store.begin().await?;
                let mut state = tx.lock_game_state().await?;
                state.is_processing = false;
                tx.update_game_state(state).await?;
                tx.commit().await?;
            }
            let outcome = galaxy_turn::advance(store, &clock, keep_last_n_turns).await?;
            println!(
                "advanced to turn {} ({} empires processed, {} ledger rows gc'd, {} failures)",
                outcome.new_turn_number,
                outcome.report.empires_processed,
                outcome.ledger_rows_gc,
                outcome.report.empire_failures.len(),
            );
            for (empire_id, message) in &outcome.report.empire_failures {
                println!("  empire {empire_id} failed: {message}");
            }
        }
        Command::Status => {
            let current = galaxy_turn::get_current(store, &clock, turn_duration).await?;
            println!(
                "turn {} | phase {:?} | {}s remaining | processing={}",
                current.turn_number,
                current.phase,
                current.time_remaining.num_seconds(),
                current.is_processing,
            );
        }
    }

    Ok(())
}
