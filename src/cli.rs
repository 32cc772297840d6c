//! Command-line interface for paidplay.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paidplay - pay a few cents, try to beat the computer
#[derive(Parser, Debug)]
#[command(name = "paidplay")]
#[command(about = "Payment-gated tic-tac-toe against a minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it is missing)
    #[arg(long, global = true, default_value = "paidplay.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively on the terminal
    Play {
        /// Seed for the computer's random moves
        #[arg(long)]
        seed: Option<u64>,

        /// Make the mock wallet refuse every payment
        #[arg(long)]
        reject_payment: bool,

        /// Skip the price API and use the fallback price
        #[arg(long)]
        offline_price: bool,
    },

    /// Print the native amount charged for a USD fee
    Quote {
        /// Fee in USD (defaults to the configured entry fee)
        #[arg(long)]
        usd: Option<f64>,

        /// Skip the price API and use the fallback price
        #[arg(long)]
        offline_price: bool,
    },

    /// Play paid rounds between a random human and the computer
    Simulate {
        /// Number of rounds
        #[arg(short, long, default_value = "100")]
        rounds: u32,

        /// Seed for both players (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}
